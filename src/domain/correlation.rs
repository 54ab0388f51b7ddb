//! Autocorrelation and partial autocorrelation of a series.
//!
//! ACF uses the demeaned, biased estimator:
//! ACF[k] = sum((x[t] - m)(x[t+k] - m) for t in 0..n-k) / sum((x[t] - m)^2)
//!
//! PACF solves the Yule-Walker equations of increasing order with the
//! Levinson-Durbin recursion; PACF[k] is the last coefficient of the
//! order-k fit. Both sequences start at lag 0 with 1.0.

use std::fmt;
use std::str::FromStr;

use super::error::DashboardError;

/// Default number of lags shown on the correlogram charts.
pub const DEFAULT_NLAGS: usize = 40;

/// Autocovariance estimator feeding the Yule-Walker equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum PacfMethod {
    /// Lag-k sums divided by `n - k`.
    #[default]
    YuleWalkerAdjusted,
    /// Lag-k sums divided by `n`.
    YuleWalkerMle,
}

impl FromStr for PacfMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yw" | "ywadjusted" => Ok(PacfMethod::YuleWalkerAdjusted),
            "ywm" | "ywmle" => Ok(PacfMethod::YuleWalkerMle),
            other => Err(format!(
                "unknown pacf method '{other}' (expected ywadjusted or ywmle)"
            )),
        }
    }
}

impl fmt::Display for PacfMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacfMethod::YuleWalkerAdjusted => f.write_str("ywadjusted"),
            PacfMethod::YuleWalkerMle => f.write_str("ywmle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LagCoefficient {
    pub lag: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Correlogram {
    pub nobs: usize,
    pub method: PacfMethod,
    pub acf: Vec<LagCoefficient>,
    pub pacf: Vec<LagCoefficient>,
}

impl Correlogram {
    pub fn compute(
        values: &[f64],
        nlags: usize,
        method: PacfMethod,
    ) -> Result<Self, DashboardError> {
        let acf = acf(values, nlags)?;
        let pacf = pacf(values, nlags, method)?;
        Ok(Self {
            nobs: values.len(),
            method,
            acf: with_lags(acf),
            pacf: with_lags(pacf),
        })
    }

    pub fn nlags(&self) -> usize {
        self.acf.len().saturating_sub(1)
    }

    /// Approximate 95% significance band, 1.96 / sqrt(n).
    pub fn band(&self) -> f64 {
        if self.nobs == 0 {
            return 0.0;
        }
        1.96 / (self.nobs as f64).sqrt()
    }
}

fn with_lags(values: Vec<f64>) -> Vec<LagCoefficient> {
    values
        .into_iter()
        .enumerate()
        .map(|(lag, value)| LagCoefficient { lag, value })
        .collect()
}

pub fn acf(values: &[f64], nlags: usize) -> Result<Vec<f64>, DashboardError> {
    let sums = lagged_sums(values, nlags)?;
    let c0 = sums[0];
    Ok(sums.iter().map(|s| s / c0).collect())
}

pub fn pacf(values: &[f64], nlags: usize, method: PacfMethod) -> Result<Vec<f64>, DashboardError> {
    let n = values.len() as f64;
    let sums = lagged_sums(values, nlags)?;
    let autocov: Vec<f64> = sums
        .iter()
        .enumerate()
        .map(|(k, s)| match method {
            PacfMethod::YuleWalkerAdjusted => s / (n - k as f64),
            PacfMethod::YuleWalkerMle => s / n,
        })
        .collect();
    Ok(levinson_durbin(&autocov, nlags))
}

/// Sums of lagged products of the demeaned series, lags 0..=nlags.
fn lagged_sums(values: &[f64], nlags: usize) -> Result<Vec<f64>, DashboardError> {
    let n = values.len();
    if n <= nlags {
        return Err(DashboardError::InsufficientData {
            what: "autocorrelation".into(),
            have: n,
            need: nlags + 1,
        });
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = values.iter().map(|v| v - mean).collect();

    let sums: Vec<f64> = (0..=nlags)
        .map(|k| {
            centered[..n - k]
                .iter()
                .zip(&centered[k..])
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect();

    // Relative to the raw magnitude so the check does not depend on scale.
    let magnitude: f64 = values.iter().map(|v| v * v).sum();
    if sums[0] <= f64::EPSILON * magnitude {
        return Err(DashboardError::Degenerate {
            what: "series".into(),
        });
    }
    Ok(sums)
}

fn levinson_durbin(autocov: &[f64], nlags: usize) -> Vec<f64> {
    let mut pacf = Vec::with_capacity(nlags + 1);
    pacf.push(1.0);

    let mut phi = vec![0.0; nlags + 1];
    let mut err = autocov[0];

    for k in 1..=nlags {
        let acc = autocov[k]
            - (1..k).map(|j| phi[j] * autocov[k - j]).sum::<f64>();
        let kappa = if err.abs() > f64::EPSILON * autocov[0] { acc / err } else { 0.0 };

        let prev = phi.clone();
        phi[k] = kappa;
        for j in 1..k {
            phi[j] = prev[j] - kappa * prev[k - j];
        }
        err *= 1.0 - kappa * kappa;
        pacf.push(kappa);
    }

    pacf
}
