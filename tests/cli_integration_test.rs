//! CLI integration tests for config handling and the CSV data path.
//!
//! Tests cover:
//! - Settings built from INI files on disk (build_data_settings, build_analysis_settings)
//! - Validation failures and their exit-code class
//! - Full pipeline from a CSV export to a prepared dashboard
//! - Text tables printed by the describe, correlogram and info commands

mod common;

use btcdash::adapters::file_config_adapter::FileConfigAdapter;
use btcdash::cli::{self, DataSource};
use btcdash::domain::correlation::{Correlogram, PacfMethod, DEFAULT_NLAGS};
use btcdash::domain::error::DashboardError;
use btcdash::domain::field::PriceField;
use btcdash::domain::summary::SummaryStatistics;
use clap::Parser;
use common::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

const VALID_INI: &str = r#"
[data]
source = yahoo
ticker = ETH-USD
start_date = 2020-01-01
end_date = 2021-01-01
base_url = http://localhost:9999
timeout_secs = 5

[analysis]
nlags = 20
pacf_method = ywmle

[web]
listen = 0.0.0.0:8080
title = Mi Dashboard
"#;

fn config(content: &str) -> FileConfigAdapter {
    FileConfigAdapter::from_string(content).unwrap()
}

mod settings {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let c = FileConfigAdapter::empty();
        let data = cli::build_data_settings(&c, None).unwrap();
        assert_eq!(data.ticker, "BTC-USD");
        assert_eq!(data.start_date, date("2018-12-01"));
        assert_eq!(data.end_date, None);
        assert_eq!(data.timeout, Duration::from_secs(30));
        assert_eq!(data.source, DataSource::Yahoo { base_url: None });

        let analysis = cli::build_analysis_settings(&c, None).unwrap();
        assert_eq!(analysis.nlags, DEFAULT_NLAGS);
        assert_eq!(analysis.method, PacfMethod::YuleWalkerAdjusted);
    }

    #[test]
    fn valid_ini_from_disk() {
        let file = write_temp_file(VALID_INI);
        let c = cli::load_config(Some(&file.path().to_path_buf())).unwrap();

        let data = cli::build_data_settings(&c, None).unwrap();
        assert_eq!(data.ticker, "ETH-USD");
        assert_eq!(data.start_date, date("2020-01-01"));
        assert_eq!(data.end_date, Some(date("2021-01-01")));
        assert_eq!(data.timeout, Duration::from_secs(5));
        assert_eq!(
            data.source,
            DataSource::Yahoo {
                base_url: Some("http://localhost:9999".into())
            }
        );

        let analysis = cli::build_analysis_settings(&c, None).unwrap();
        assert_eq!(analysis.nlags, 20);
        assert_eq!(analysis.method, PacfMethod::YuleWalkerMle);
    }

    #[cfg(feature = "yahoo")]
    #[test]
    fn yahoo_port_builds_with_default_endpoint() {
        let data = cli::build_data_settings(&FileConfigAdapter::empty(), None).unwrap();
        assert!(cli::data_port_for(&data).is_ok());
    }

    #[test]
    fn csv_flag_overrides_source() {
        let c = config(VALID_INI);
        let data = cli::build_data_settings(&c, Some(Path::new("prices.csv"))).unwrap();
        assert_eq!(
            data.source,
            DataSource::Csv {
                path: PathBuf::from("prices.csv")
            }
        );
    }

    #[test]
    fn csv_source_from_config() {
        let c = config("[data]\nsource = csv\ncsv_path = data/btc.csv\n");
        let data = cli::build_data_settings(&c, None).unwrap();
        assert_eq!(
            data.source,
            DataSource::Csv {
                path: PathBuf::from("data/btc.csv")
            }
        );
    }

    #[test]
    fn lags_flag_overrides_config() {
        let c = config(VALID_INI);
        let analysis = cli::build_analysis_settings(&c, Some(10)).unwrap();
        assert_eq!(analysis.nlags, 10);
        assert!(cli::build_analysis_settings(&c, Some(0)).is_err());
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let path = PathBuf::from("/nonexistent/btcdash.ini");
        assert!(matches!(
            cli::load_config(Some(&path)),
            Err(DashboardError::ConfigParse { .. })
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            "[data]\nstart_date = 01/12/2018\n",
            "[data]\nstart_date = 2021-01-01\nend_date = 2020-01-01\n",
            "[data]\nsource = parquet\n",
            "[data]\nsource = csv\n",
            "[data]\nbase_url = ftp://example.com\n",
            "[data]\ntimeout_secs = 0\n",
        ];
        for ini in cases {
            let err = cli::build_data_settings(&config(ini), None).unwrap_err();
            assert!(
                matches!(
                    err,
                    DashboardError::ConfigInvalid { .. } | DashboardError::ConfigMissing { .. }
                ),
                "{ini} gave {err:?}"
            );
        }

        for ini in [
            "[analysis]\nnlags = 0\n",
            "[analysis]\nnlags = abc\n",
            "[analysis]\npacf_method = ols\n",
        ] {
            assert!(cli::build_analysis_settings(&config(ini), None).is_err());
        }
    }
}

mod csv_pipeline {
    use super::*;

    fn write_long_csv(rows: usize) -> tempfile::NamedTempFile {
        let mut content = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
        for bar in generate_bars("2018-12-01", rows, 4000.0) {
            content.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                bar.date,
                bar.open.unwrap(),
                bar.high.unwrap(),
                bar.low.unwrap(),
                bar.close.unwrap(),
                bar.close.unwrap(),
                bar.volume.unwrap()
            ));
        }
        write_temp_file(&content)
    }

    #[test]
    fn csv_to_dashboard() {
        let file = write_long_csv(120);
        let c = FileConfigAdapter::empty();
        let data = cli::build_data_settings(&c, Some(file.path())).unwrap();
        let analysis = cli::build_analysis_settings(&c, None).unwrap();
        let port = cli::data_port_for(&data).unwrap();

        let dash = cli::load_dashboard(port.as_ref(), &data, &analysis).unwrap();
        assert_eq!(dash.series().len(), 120);
        assert_eq!(dash.correlogram().acf.len(), 41);
    }

    #[test]
    fn csv_respects_date_window() {
        let file = write_long_csv(120);
        let c = config("[data]\nstart_date = 2019-01-01\nend_date = 2019-01-31\n");
        let data = cli::build_data_settings(&c, Some(file.path())).unwrap();
        let port = cli::data_port_for(&data).unwrap();
        let series = cli::fetch_series(port.as_ref(), &data).unwrap();
        assert_eq!(
            series.date_range(),
            Some((date("2019-01-01"), date("2019-01-31")))
        );
    }

    #[test]
    fn missing_csv_is_fetch_error() {
        let c = FileConfigAdapter::empty();
        let data =
            cli::build_data_settings(&c, Some(Path::new("/nonexistent/prices.csv"))).unwrap();
        let port = cli::data_port_for(&data).unwrap();
        let err = cli::fetch_series(port.as_ref(), &data).unwrap_err();
        assert!(matches!(err, DashboardError::Fetch { .. }));
    }

    #[test]
    fn csv_outside_window_is_no_data() {
        let file = write_temp_file(SAMPLE_CSV);
        let c = config("[data]\nstart_date = 2020-01-01\n");
        let data = cli::build_data_settings(&c, Some(file.path())).unwrap();
        let port = cli::data_port_for(&data).unwrap();
        let err = cli::fetch_series(port.as_ref(), &data).unwrap_err();
        assert!(matches!(err, DashboardError::NoData { .. }));
    }
}

mod output {
    use super::*;

    #[test]
    fn summary_table_lists_statistics() {
        let series = PriceSeries::new("BTC-USD", generate_bars("2018-12-01", 10, 4000.0));
        let table = cli::format_summary_table(&SummaryStatistics::compute(&series));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("Apertura"));
        assert!(lines[0].contains("Volumen"));
        assert!(lines[1].starts_with("count"));
        assert!(lines[8].starts_with("max"));
    }

    #[test]
    fn correlogram_table_has_row_per_lag() {
        let series = generate_series(60);
        let c = Correlogram::compute(&series.values(PriceField::Close), 5, PacfMethod::default())
            .unwrap();
        let table = cli::format_correlogram_table(&c);
        // header, lags 0..=5, footer
        assert_eq!(table.lines().count(), 8);
        assert!(table.contains("n = 60"));
    }

    #[test]
    fn info_reports_range_and_counts() {
        let file = write_temp_file(SAMPLE_CSV);
        let c = FileConfigAdapter::empty();
        let data = cli::build_data_settings(&c, Some(file.path())).unwrap();
        let port = cli::data_port_for(&data).unwrap();
        let info = cli::format_info(&cli::fetch_series(port.as_ref(), &data).unwrap());
        assert!(info.contains("rows: 5"));
        assert!(info.contains("Fecha: 2018-12-01 .. 2018-12-05"));
        assert!(info.contains("Cierre: 5 non-null"));
    }
}

mod arguments {
    use super::*;
    use btcdash::cli::{Cli, Command};

    #[test]
    fn parses_correlogram_flags() {
        let cli = Cli::try_parse_from([
            "btcdash",
            "correlogram",
            "--csv",
            "prices.csv",
            "--lags",
            "12",
        ])
        .unwrap();
        match cli.command {
            Command::Correlogram { source, lags } => {
                assert_eq!(source.csv, Some(PathBuf::from("prices.csv")));
                assert_eq!(lags, Some(12));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_serve_with_config() {
        let cli =
            Cli::try_parse_from(["btcdash", "serve", "-c", "btcdash.ini", "--listen", "0.0.0.0:80"])
                .unwrap();
        match cli.command {
            Command::Serve { source, listen } => {
                assert_eq!(source.config, Some(PathBuf::from("btcdash.ini")));
                assert_eq!(listen.as_deref(), Some("0.0.0.0:80"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
