//! Daily OHLCV records and the immutable price series built from them.

use chrono::NaiveDate;

use super::field::PriceField;

/// One daily record. Upstream data may leave any numeric value empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<i64>,
}

impl PriceBar {
    pub fn value(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume.map(|v| v as f64),
        }
    }

    /// True when every numeric value is missing.
    pub fn is_empty(&self) -> bool {
        PriceField::ALL.iter().all(|&f| self.value(f).is_none())
    }

    fn sanitized(self) -> Self {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Self {
            date: self.date,
            open: finite(self.open),
            high: finite(self.high),
            low: finite(self.low),
            close: finite(self.close),
            volume: self.volume,
        }
    }
}

/// Ascending, date-unique daily series for one ticker.
///
/// There is no mutating API: once built, a series is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Normalize raw records: non-finite values become missing, rows with
    /// no numeric value are dropped, duplicate dates keep the last record,
    /// and the result is sorted by date.
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        let mut cleaned: Vec<PriceBar> = bars
            .into_iter()
            .map(PriceBar::sanitized)
            .filter(|b| !b.is_empty())
            .collect();
        cleaned.sort_by_key(|b| b.date);

        let mut unique: Vec<PriceBar> = Vec::with_capacity(cleaned.len());
        for bar in cleaned {
            match unique.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => unique.push(bar),
            }
        }

        Self {
            ticker: ticker.into(),
            bars: unique,
        }
    }

    /// Keep only records in `[start, end]`; an open end keeps everything
    /// from `start` on.
    pub fn restrict(mut self, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        self.bars
            .retain(|b| b.date >= start && end.is_none_or(|e| b.date <= e));
        self
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.bars.first()?.date, self.bars.last()?.date))
    }

    /// Non-missing values of a field, in date order.
    pub fn values(&self, field: PriceField) -> Vec<f64> {
        self.bars.iter().filter_map(|b| b.value(field)).collect()
    }

    /// `(date, value)` pairs for the rows where the field is present.
    pub fn points(&self, field: PriceField) -> Vec<(NaiveDate, f64)> {
        self.bars
            .iter()
            .filter_map(|b| b.value(field).map(|v| (b.date, v)))
            .collect()
    }

    pub fn non_null_count(&self, field: PriceField) -> usize {
        self.bars.iter().filter(|b| b.value(field).is_some()).count()
    }
}
