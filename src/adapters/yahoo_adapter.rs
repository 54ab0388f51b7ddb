//! Yahoo Finance chart API adapter.
//!
//! One blocking GET on `/v8/finance/chart/{ticker}` with daily interval.
//! Called once before the web runtime starts; there is no retry.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// The endpoint rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub struct YahooAdapter {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl YahooAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DashboardError::Fetch {
                reason: format!("failed to create HTTP client: {}", e),
            })?;
        tracing::debug!(%base_url, ?timeout, "created Yahoo Finance client");
        Ok(Self { base_url, client })
    }

    pub fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, ticker)
    }
}

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Decode a chart response body into raw (not yet normalized) bars.
pub fn parse_chart(body: &str) -> Result<Vec<PriceBar>, DashboardError> {
    let envelope: ChartEnvelope = serde_json::from_str(body).map_err(|e| DashboardError::Parse {
        reason: format!("invalid chart response: {}", e),
    })?;

    if let Some(err) = envelope.chart.error {
        return Err(DashboardError::Fetch {
            reason: format!("{}: {}", err.code, err.description),
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;
    let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = DateTime::<Utc>::from_timestamp(ts + offset, 0)?.date_naive();
            Some(PriceBar {
                date,
                open: at(&quote.open, i),
                high: at(&quote.high, i),
                low: at(&quote.low, i),
                close: at(&quote.close, i),
                volume: at(&quote.volume, i).map(|v| v.round() as i64),
            })
        })
        .collect();

    Ok(bars)
}

impl DataPort for YahooAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, DashboardError> {
        let period1 = epoch_seconds(start_date);
        let period2 = match end_date {
            Some(end) => epoch_seconds(end.succ_opt().unwrap_or(end)),
            None => Utc::now().timestamp(),
        };
        let url = self.chart_url(ticker);
        tracing::info!(%url, ticker, %start_date, ?end_date, "fetching daily OHLCV");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .map_err(|e| DashboardError::Fetch {
                reason: format!("request to {} failed: {}", url, e),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| DashboardError::Fetch {
            reason: format!("failed to read response body: {}", e),
        })?;
        if !status.is_success() {
            // Yahoo reports unknown tickers as 404 with a chart.error body.
            if let Err(err @ DashboardError::Fetch { .. }) = parse_chart(&body) {
                return Err(err);
            }
            return Err(DashboardError::Fetch {
                reason: format!("{} returned status {}", url, status),
            });
        }

        let bars = parse_chart(&body)?;
        tracing::info!(rows = bars.len(), "received chart data");
        Ok(PriceSeries::new(ticker, bars).restrict(start_date, end_date))
    }
}
