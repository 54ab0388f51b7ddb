#![allow(dead_code)]

use btcdash::domain::error::DashboardError;
pub use btcdash::domain::ohlcv::{PriceBar, PriceSeries};
use btcdash::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate};
use std::cell::Cell;

/// In-memory data port returning a fixed set of bars or a fixed error.
pub struct MockDataPort {
    pub bars: Vec<PriceBar>,
    pub error: Option<String>,
    pub calls: Cell<usize>,
}

impl MockDataPort {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self {
            bars,
            error: None,
            calls: Cell::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
            calls: Cell::new(0),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, DashboardError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = &self.error {
            return Err(DashboardError::Fetch {
                reason: reason.clone(),
            });
        }
        Ok(PriceSeries::new(ticker, self.bars.clone()).restrict(start_date, end_date))
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(d: &str, close: f64) -> PriceBar {
    PriceBar {
        date: date(d),
        open: Some(close),
        high: Some(close + 1.0),
        low: Some(close - 1.0),
        close: Some(close),
        volume: Some(1_000),
    }
}

/// Daily bars with a deterministic, non-constant close that wanders upward.
pub fn generate_bars(start: &str, count: usize, base_price: f64) -> Vec<PriceBar> {
    let start = date(start);
    (0..count)
        .map(|i| {
            let wobble = ((i * 7919) % 13) as f64 - 6.0;
            let close = base_price + i as f64 * 0.5 + wobble;
            PriceBar {
                date: start + Duration::days(i as i64),
                open: Some(close - 0.25),
                high: Some(close + 2.0),
                low: Some(close - 2.0),
                close: Some(close),
                volume: Some(10_000 + (i as i64) * 10),
            }
        })
        .collect()
}

pub fn generate_series(count: usize) -> PriceSeries {
    PriceSeries::new("BTC-USD", generate_bars("2018-12-01", count, 4000.0))
}

pub const SAMPLE_CSV: &str = "\
Date,Open,High,Low,Close,Volume
2018-12-01,4024.46,4309.38,3969.71,4214.67,5375314093
2018-12-02,4200.73,4301.52,4110.98,4139.88,5262697895
2018-12-03,4147.32,4155.98,3840.45,3894.13,5089570994
2018-12-04,3886.29,4075.63,3832.75,3956.89,5028069239
2018-12-05,3958.89,3969.54,3753.99,3753.99,5302481573
";

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
