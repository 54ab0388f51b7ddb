//! Market data access port trait.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily OHLCV for `ticker` from `start_date` through `end_date`
    /// (latest available when `None`), already normalized.
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, DashboardError>;
}
