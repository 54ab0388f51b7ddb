//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// An adapter with no keys; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[data]
source = yahoo
ticker = BTC-USD
start_date = 2018-12-01
timeout_secs = 15

[analysis]
nlags = 40
pacf_method = ywadjusted

[web]
listen = 127.0.0.1:8050
title = Dashboard BTC
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("data", "ticker"), Some("BTC-USD".to_string()));
        assert_eq!(
            adapter.get_string("web", "listen"),
            Some("127.0.0.1:8050".to_string())
        );
        assert_eq!(adapter.get_int("analysis", "nlags", 0), 40);
        assert_eq!(adapter.get_int("data", "timeout_secs", 30), 15);
    }

    #[test]
    fn missing_keys_fall_back() {
        let adapter = FileConfigAdapter::from_string("[data]\nticker = BTC-USD\n").unwrap();
        assert_eq!(adapter.get_string("data", "end_date"), None);
        assert_eq!(adapter.get_string("web", "listen"), None);
        assert_eq!(adapter.get_int("analysis", "nlags", 40), 40);
    }

    #[test]
    fn non_numeric_values_fall_back() {
        let adapter = FileConfigAdapter::from_string("[analysis]\nnlags = many\n").unwrap();
        assert_eq!(adapter.get_int("analysis", "nlags", 40), 40);
        assert_eq!(
            adapter.get_string("analysis", "nlags"),
            Some("many".to_string())
        );
    }

    #[test]
    fn empty_adapter_uses_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("data", "ticker"), None);
        assert_eq!(adapter.get_int("analysis", "nlags", 40), 40);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("analysis", "pacf_method"),
            Some("ywadjusted".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        assert!(FileConfigAdapter::from_file("/nonexistent/btcdash.ini").is_err());
    }
}
