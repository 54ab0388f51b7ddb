//! Configuration validation.
//!
//! Every key is optional; present values are checked before any data is
//! fetched.

use crate::domain::correlation::PacfMethod;
use crate::domain::error::DashboardError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    validate_dates(config)?;
    validate_source(config)?;
    validate_base_url(config)?;
    validate_timeout(config)?;
    Ok(())
}

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    validate_nlags(config)?;
    validate_pacf_method(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DashboardError {
    DashboardError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Read an optional non-blank string.
pub fn non_blank(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn parse_date(value: &str, key: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            "data",
            key,
            format!("invalid {key} format, expected YYYY-MM-DD"),
        )
    })
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let start = non_blank(config, "data", "start_date")
        .map(|s| parse_date(&s, "start_date"))
        .transpose()?;
    let end = non_blank(config, "data", "end_date")
        .map(|s| parse_date(&s, "end_date"))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid(
                "data",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let source = non_blank(config, "data", "source").unwrap_or_else(|| "yahoo".to_string());
    match source.to_lowercase().as_str() {
        "yahoo" => Ok(()),
        "csv" => match non_blank(config, "data", "csv_path") {
            Some(_) => Ok(()),
            None => Err(DashboardError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_path".to_string(),
            }),
        },
        other => Err(invalid(
            "data",
            "source",
            format!("unknown source '{other}' (expected yahoo or csv)"),
        )),
    }
}

fn validate_base_url(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    match non_blank(config, "data", "base_url") {
        Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => Err(invalid(
            "data",
            "base_url",
            "base_url must start with http:// or https://",
        )),
        _ => Ok(()),
    }
}

/// A present value must be an integer of at least 1.
fn validate_positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), DashboardError> {
    let Some(raw) = non_blank(config, section, key) else {
        return Ok(());
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(()),
        Ok(_) => Err(invalid(section, key, format!("{key} must be at least 1"))),
        Err(_) => Err(invalid(section, key, format!("{key} must be an integer, got '{raw}'"))),
    }
}

fn validate_timeout(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    validate_positive_int(config, "data", "timeout_secs")
}

fn validate_nlags(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    validate_positive_int(config, "analysis", "nlags")
}

fn validate_pacf_method(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    if let Some(method) = non_blank(config, "analysis", "pacf_method") {
        method
            .parse::<PacfMethod>()
            .map_err(|reason| invalid("analysis", "pacf_method", reason))?;
    }
    Ok(())
}
