//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    non_blank, parse_date, validate_analysis_config, validate_data_config,
};
use crate::domain::correlation::{Correlogram, PacfMethod, DEFAULT_NLAGS};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::DashboardError;
use crate::domain::field::{PriceField, DATE_COLUMN};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::summary::SummaryStatistics;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_TICKER: &str = "BTC-USD";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8050";

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 12, 1).unwrap_or_default()
}

#[derive(Parser, Debug)]
#[command(name = "btcdash", about = "Historical Bitcoin price dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Read prices from a CSV export instead of the configured source
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the data and start the web dashboard
    Serve {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        listen: Option<String>,
    },
    /// Print descriptive statistics for every numeric field
    Describe {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print ACF and PACF of the closing price
    Correlogram {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        lags: Option<usize>,
    },
    /// Show the date range and row counts of the fetched data
    Info {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// `None` uses the adapter's default endpoint.
    Yahoo { base_url: Option<String> },
    Csv { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub source: DataSource,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    pub nlags: usize,
    pub method: PacfMethod,
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing();
    match cli.command {
        Command::Serve { source, listen } => run_serve(&source, listen.as_deref()),
        Command::Describe { source } => run_describe(&source),
        Command::Correlogram { source, lags } => run_correlogram(&source, lags),
        Command::Info { source } => run_info(&source),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // A second call (tests driving `run` twice) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn fail(err: DashboardError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// Load the INI file, or an empty configuration when none is given.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, DashboardError> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    tracing::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| DashboardError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_data_settings(
    config: &dyn ConfigPort,
    csv_override: Option<&Path>,
) -> Result<DataSettings, DashboardError> {
    validate_data_config(config)?;

    let start_date = match non_blank(config, "data", "start_date") {
        Some(s) => parse_date(&s, "start_date")?,
        None => default_start_date(),
    };
    let end_date = non_blank(config, "data", "end_date")
        .map(|s| parse_date(&s, "end_date"))
        .transpose()?;

    let source = match csv_override {
        Some(path) => DataSource::Csv {
            path: path.to_path_buf(),
        },
        None => match non_blank(config, "data", "source").as_deref().map(str::to_lowercase) {
            Some(s) if s == "csv" => DataSource::Csv {
                path: non_blank(config, "data", "csv_path")
                    .map(PathBuf::from)
                    .unwrap_or_default(),
            },
            _ => DataSource::Yahoo {
                base_url: non_blank(config, "data", "base_url"),
            },
        },
    };

    Ok(DataSettings {
        ticker: non_blank(config, "data", "ticker").unwrap_or_else(|| DEFAULT_TICKER.to_string()),
        start_date,
        end_date,
        source,
        timeout: Duration::from_secs(config.get_int("data", "timeout_secs", 30).max(1) as u64),
    })
}

pub fn build_analysis_settings(
    config: &dyn ConfigPort,
    lags_override: Option<usize>,
) -> Result<AnalysisSettings, DashboardError> {
    validate_analysis_config(config)?;

    let method = match non_blank(config, "analysis", "pacf_method") {
        Some(m) => m.parse().map_err(|reason| DashboardError::ConfigInvalid {
            section: "analysis".into(),
            key: "pacf_method".into(),
            reason,
        })?,
        None => PacfMethod::default(),
    };
    let nlags = match lags_override {
        Some(0) => {
            return Err(DashboardError::ConfigInvalid {
                section: "analysis".into(),
                key: "nlags".into(),
                reason: "nlags must be at least 1".into(),
            });
        }
        Some(n) => n,
        None => config.get_int("analysis", "nlags", DEFAULT_NLAGS as i64) as usize,
    };

    Ok(AnalysisSettings { nlags, method })
}

/// Pick the adapter for the configured source.
pub fn data_port_for(
    settings: &DataSettings,
) -> Result<Box<dyn DataPort + Send + Sync>, DashboardError> {
    match &settings.source {
        DataSource::Csv { path } => Ok(Box::new(CsvAdapter::new(path.clone()))),
        #[cfg(feature = "yahoo")]
        DataSource::Yahoo { base_url } => {
            use crate::adapters::yahoo_adapter::{YahooAdapter, DEFAULT_BASE_URL};
            let base_url = base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
            Ok(Box::new(YahooAdapter::new(base_url, settings.timeout)?))
        }
        #[cfg(not(feature = "yahoo"))]
        DataSource::Yahoo { .. } => Err(DashboardError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: "yahoo feature is required for the yahoo source".into(),
        }),
    }
}

/// Fetch and normalize the series; an empty result is an error.
pub fn fetch_series(
    port: &dyn DataPort,
    settings: &DataSettings,
) -> Result<PriceSeries, DashboardError> {
    let series = port.fetch_series(&settings.ticker, settings.start_date, settings.end_date)?;
    if series.is_empty() {
        return Err(DashboardError::NoData {
            ticker: settings.ticker.clone(),
        });
    }
    Ok(series)
}

pub fn load_dashboard(
    port: &dyn DataPort,
    data: &DataSettings,
    analysis: &AnalysisSettings,
) -> Result<Dashboard, DashboardError> {
    let series = fetch_series(port, data)?;
    Dashboard::prepare(series, analysis.nlags, analysis.method)
}

fn resolve_series(source: &SourceArgs) -> Result<PriceSeries, DashboardError> {
    let config = load_config(source.config.as_ref())?;
    let settings = build_data_settings(&config, source.csv.as_deref())?;
    let port = data_port_for(&settings)?;
    fetch_series(port.as_ref(), &settings)
}

pub fn format_summary_table(summary: &SummaryStatistics) -> String {
    let mut out = format!("{:<8}", "");
    for column in &summary.columns {
        out.push_str(&format!("{:>18}", column.display_name()));
    }
    out.push('\n');
    for row in &summary.rows {
        out.push_str(&format!("{:<8}", row.statistic.label()));
        for value in &row.values {
            out.push_str(&format!("{:>18.4}", value));
        }
        out.push('\n');
    }
    out
}

pub fn format_correlogram_table(correlogram: &Correlogram) -> String {
    let mut out = format!("{:>4} {:>10} {:>10}\n", "lag", "acf", "pacf");
    for (a, p) in correlogram.acf.iter().zip(&correlogram.pacf) {
        out.push_str(&format!("{:>4} {:>10.4} {:>10.4}\n", a.lag, a.value, p.value));
    }
    out.push_str(&format!(
        "n = {}, 95% band = ±{:.4}, pacf method = {}\n",
        correlogram.nobs,
        correlogram.band(),
        correlogram.method
    ));
    out
}

pub fn format_info(series: &PriceSeries) -> String {
    let mut out = format!("ticker: {}\nrows: {}\n", series.ticker(), series.len());
    if let Some((first, last)) = series.date_range() {
        out.push_str(&format!("{}: {} .. {}\n", DATE_COLUMN, first, last));
    }
    for field in PriceField::ALL {
        out.push_str(&format!(
            "{}: {} non-null\n",
            field.display_name(),
            series.non_null_count(field)
        ));
    }
    out
}

fn run_describe(source: &SourceArgs) -> ExitCode {
    match resolve_series(source) {
        Ok(series) => {
            print!("{}", format_summary_table(&SummaryStatistics::compute(&series)));
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn closing_correlogram(
    source: &SourceArgs,
    lags: Option<usize>,
) -> Result<Correlogram, DashboardError> {
    let config = load_config(source.config.as_ref())?;
    let analysis = build_analysis_settings(&config, lags)?;
    let series = resolve_series(source)?;
    Correlogram::compute(&series.values(PriceField::Close), analysis.nlags, analysis.method)
}

fn run_correlogram(source: &SourceArgs, lags: Option<usize>) -> ExitCode {
    match closing_correlogram(source, lags) {
        Ok(correlogram) => {
            print!("{}", format_correlogram_table(&correlogram));
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_info(source: &SourceArgs) -> ExitCode {
    match resolve_series(source) {
        Ok(series) => {
            print!("{}", format_info(&series));
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_serve(source: &SourceArgs, listen: Option<&str>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let config = match load_config(source.config.as_ref()) {
            Ok(c) => c,
            Err(e) => return fail(e),
        };

        let listen = listen
            .map(str::to_string)
            .or_else(|| non_blank(&config, "web", "listen"))
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let addr: SocketAddr = match listen.parse() {
            Ok(a) => a,
            Err(_) => {
                return fail(DashboardError::ConfigInvalid {
                    section: "web".into(),
                    key: "listen".into(),
                    reason: format!("'{listen}' is not a socket address"),
                });
            }
        };

        // Blocking fetch happens before the runtime exists.
        let dashboard = match build_data_settings(&config, source.csv.as_deref())
            .and_then(|data| {
                let analysis = build_analysis_settings(&config, None)?;
                let port = data_port_for(&data)?;
                load_dashboard(port.as_ref(), &data, &analysis)
            }) {
            Ok(d) => d,
            Err(e) => return fail(e),
        };

        let state = AppState {
            dashboard: Arc::new(dashboard),
            config: Arc::new(config),
        };
        let router = build_router(state);

        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => return fail(DashboardError::Io(e)),
        };

        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!("Starting web server on http://{}", addr);
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(DashboardError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (source, listen);
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
