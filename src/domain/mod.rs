//! Core domain types and analysis.

pub mod config_validation;
pub mod correlation;
pub mod dashboard;
pub mod error;
pub mod field;
pub mod line_series;
pub mod ohlcv;
pub mod summary;
