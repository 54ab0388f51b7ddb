//! CSV file data adapter.
//!
//! Reads a Yahoo-style daily export (`Date,Open,High,Low,Close,Adj Close,Volume`).
//! Columns are matched by header name, English or display form, so column
//! order and extra columns do not matter.

use crate::domain::error::DashboardError;
use crate::domain::field::{PriceField, DATE_COLUMN};
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

struct Columns {
    date: usize,
    fields: Vec<(PriceField, usize)>,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, DashboardError> {
        let find = |names: &[&str]| headers.iter().position(|h| names.contains(&h.trim()));

        let date = find(&["Date", DATE_COLUMN]).ok_or_else(|| DashboardError::Parse {
            reason: "missing Date column".into(),
        })?;
        let fields = PriceField::ALL
            .iter()
            .filter_map(|&f| find(&[f.upstream_name(), f.display_name()]).map(|i| (f, i)))
            .collect();

        Ok(Columns { date, fields })
    }

    fn parse_row(record: &csv::StringRecord, columns: &Columns) -> Option<PriceBar> {
        let date = record.get(columns.date).and_then(parse_date)?;
        let mut bar = PriceBar {
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        };

        for &(field, idx) in &columns.fields {
            let cell = record.get(idx).unwrap_or("").trim();
            let value = parse_cell(cell)?;
            match field {
                PriceField::Open => bar.open = value,
                PriceField::High => bar.high = value,
                PriceField::Low => bar.low = value,
                PriceField::Close => bar.close = value,
                PriceField::Volume => bar.volume = value.map(|v| v.round() as i64),
            }
        }
        Some(bar)
    }
}

/// `2024-01-15` or a timestamp starting with it.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    let day = cell.get(..10).unwrap_or(cell);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// `Some(None)` for an empty cell, `None` for garbage.
fn parse_cell(cell: &str) -> Option<Option<f64>> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("null") || cell.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    cell.parse::<f64>().ok().map(Some)
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, DashboardError> {
        tracing::info!(path = %self.path.display(), ticker, "reading price data from CSV");
        let content = fs::read_to_string(&self.path).map_err(|e| DashboardError::Fetch {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| DashboardError::Parse {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let columns = Self::locate_columns(&headers)?;

        let mut bars = Vec::new();
        let mut dropped = 0usize;
        for result in rdr.records() {
            let record = result.map_err(|e| DashboardError::Parse {
                reason: format!("CSV parse error: {}", e),
            })?;
            match Self::parse_row(&record, &columns) {
                Some(bar) => bars.push(bar),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, "dropped CSV rows with invalid date or values");
        }

        Ok(PriceSeries::new(ticker, bars).restrict(start_date, end_date))
    }
}
