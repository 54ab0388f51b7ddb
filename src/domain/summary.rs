//! Descriptive statistics over every numeric field.
//!
//! Mean, sample standard deviation, min and max come from `statrs`;
//! quartiles use linear interpolation between order statistics.

use statrs::statistics::Statistics;

use super::field::PriceField;
use super::ohlcv::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Statistic {
    Count,
    Mean,
    Std,
    Min,
    Q25,
    Median,
    Q75,
    Max,
}

impl Statistic {
    pub const ALL: [Statistic; 8] = [
        Statistic::Count,
        Statistic::Mean,
        Statistic::Std,
        Statistic::Min,
        Statistic::Q25,
        Statistic::Median,
        Statistic::Q75,
        Statistic::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Min => "min",
            Statistic::Q25 => "25%",
            Statistic::Median => "50%",
            Statistic::Q75 => "75%",
            Statistic::Max => "max",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SummaryRow {
    pub statistic: Statistic,
    /// One value per column, in [`SummaryStatistics::columns`] order.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SummaryStatistics {
    pub columns: Vec<PriceField>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryStatistics {
    /// Compute the table from scratch. Pure in `series`.
    pub fn compute(series: &PriceSeries) -> Self {
        let columns = PriceField::ALL.to_vec();
        let described: Vec<[f64; 8]> = columns
            .iter()
            .map(|&f| describe(&series.values(f)))
            .collect();

        let rows = Statistic::ALL
            .iter()
            .enumerate()
            .map(|(i, &statistic)| SummaryRow {
                statistic,
                values: described.iter().map(|d| d[i]).collect(),
            })
            .collect();

        Self { columns, rows }
    }

    pub fn get(&self, statistic: Statistic, field: PriceField) -> Option<f64> {
        let col = self.columns.iter().position(|&c| c == field)?;
        let row = self.rows.iter().find(|r| r.statistic == statistic)?;
        row.values.get(col).copied()
    }
}

/// count, mean, std, min, 25%, 50%, 75%, max for one column.
fn describe(values: &[f64]) -> [f64; 8] {
    if values.is_empty() {
        let mut out = [f64::NAN; 8];
        out[0] = 0.0;
        return out;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    [
        values.len() as f64,
        Statistics::mean(values.iter()),
        Statistics::std_dev(values.iter()),
        Statistics::min(values.iter()),
        quantile(&sorted, 0.25),
        quantile(&sorted, 0.50),
        quantile(&sorted, 0.75),
        Statistics::max(values.iter()),
    ]
}

/// Linear interpolation at position `q * (n - 1)` of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
