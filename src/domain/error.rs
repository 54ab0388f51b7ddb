//! Domain error types.

/// Top-level error type for btcdash.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("fetch error: {reason}")]
    Fetch { reason: String },

    #[error("parse error: {reason}")]
    Parse { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {what}: have {have} observations, need {need}")]
    InsufficientData {
        what: String,
        have: usize,
        need: usize,
    },

    #[error("{what} has zero variance")]
    Degenerate { what: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) => 1,
            DashboardError::ConfigParse { .. }
            | DashboardError::ConfigMissing { .. }
            | DashboardError::ConfigInvalid { .. } => 2,
            DashboardError::Fetch { .. } | DashboardError::Parse { .. } => 3,
            DashboardError::NoData { .. }
            | DashboardError::InsufficientData { .. }
            | DashboardError::Degenerate { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
