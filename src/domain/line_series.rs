//! Line-series selection for the price chart.

use chrono::NaiveDate;

use super::field::PriceField;
use super::ohlcv::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub enum LineView {
    /// Time-ordered points for a field with at least one value.
    Series {
        field: PriceField,
        points: Vec<(NaiveDate, f64)>,
    },
    /// The requested field is unknown or has no values.
    Unavailable { requested: String },
}

impl LineView {
    pub fn is_available(&self) -> bool {
        matches!(self, LineView::Series { .. })
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        match self {
            LineView::Series { points, .. } => points,
            LineView::Unavailable { .. } => &[],
        }
    }
}

/// Select the line to plot for `name`. Never fails: anything that cannot be
/// drawn becomes [`LineView::Unavailable`].
pub fn select_line(series: &PriceSeries, name: &str) -> LineView {
    let Some(field) = PriceField::from_name(name) else {
        return LineView::Unavailable {
            requested: name.to_string(),
        };
    };

    let points = series.points(field);
    if points.is_empty() {
        LineView::Unavailable {
            requested: name.to_string(),
        }
    } else {
        LineView::Series { field, points }
    }
}
