//! Startup snapshot shared by every view.
//!
//! Built once after the data fetch; the series and its correlogram are
//! never modified afterwards, so readers need no locking.

use super::correlation::{Correlogram, PacfMethod};
use super::error::DashboardError;
use super::field::PriceField;
use super::line_series::{select_line, LineView};
use super::ohlcv::PriceSeries;
use super::summary::SummaryStatistics;

#[derive(Debug, Clone)]
pub struct Dashboard {
    series: PriceSeries,
    correlogram: Correlogram,
}

impl Dashboard {
    /// Compute the closing-price correlogram and freeze the series.
    pub fn prepare(
        series: PriceSeries,
        nlags: usize,
        method: PacfMethod,
    ) -> Result<Self, DashboardError> {
        if series.is_empty() {
            return Err(DashboardError::NoData {
                ticker: series.ticker().to_string(),
            });
        }
        let closes = series.values(PriceField::Close);
        let correlogram = Correlogram::compute(&closes, nlags, method)?;
        tracing::info!(
            ticker = series.ticker(),
            rows = series.len(),
            nlags,
            %method,
            "dashboard prepared"
        );
        Ok(Self {
            series,
            correlogram,
        })
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn correlogram(&self) -> &Correlogram {
        &self.correlogram
    }

    pub fn line(&self, field_name: &str) -> LineView {
        select_line(&self.series, field_name)
    }

    /// Recomputed on every call.
    pub fn summary(&self) -> SummaryStatistics {
        SummaryStatistics::compute(&self.series)
    }
}
