//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they
//! can be:
//!
//! - used in-memory while the pipeline runs
//! - exported to CSV/xlsx
//! - asserted against directly in tests
//!
//! The original workflow this replaces kept everything in loosely-typed
//! per-name dictionaries; explicit records give us shape checking at
//! compile time instead of at crash time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A named, date-indexed value series.
///
/// Invariants (enforced by [`Series::new`]):
/// - `dates.len() == values.len()`
/// - dates strictly increasing (no duplicates)
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl Series {
    /// Build a series, validating the date-index invariants.
    pub fn new(
        name: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self, PipelineError> {
        let name = name.into();
        if dates.len() != values.len() {
            return Err(PipelineError::InvalidInput(format!(
                "series '{name}': {} dates vs {} values",
                dates.len(),
                values.len()
            )));
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(PipelineError::InvalidInput(format!(
                    "series '{name}': dates not strictly increasing at {}",
                    pair[1]
                )));
            }
        }
        Ok(Self { name, dates, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Whether an input series arrives as price levels or as precomputed
/// returns.
///
/// Price inputs get the log-return transform; return inputs pass through
/// untouched. The distinction is declared per input because the source
/// files for the equity index already hold returns while the downloaded
/// commodity data holds closing prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesForm {
    Prices,
    Returns,
}

/// A date-keyed table with one column per named series.
///
/// Built by an inner join across all input series: only dates where every
/// column has a finite value survive. Invariant: every column has exactly
/// `dates.len()` finite entries.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFrame {
    pub dates: Vec<NaiveDate>,
    pub names: Vec<String>,
    /// Column-major storage; `columns[i]` belongs to `names[i]`.
    pub columns: Vec<Vec<f64>>,
}

impl AlignedFrame {
    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&self.columns[idx])
    }
}

/// Per-series descriptive statistics over the aligned dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator).
    pub std: f64,
}

/// Deterministic-term specification for the unit-root regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// No deterministic terms.
    None,
    /// Constant only (the usual choice for return series).
    Constant,
    /// Constant plus linear time trend.
    ConstantTrend,
}

/// Stationarity conclusion at the configured significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stationarity {
    Stationary,
    NonStationary,
}

impl Stationarity {
    pub fn from_p_value(p_value: f64, significance: f64) -> Self {
        if p_value < significance {
            Stationarity::Stationary
        } else {
            Stationarity::NonStationary
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stationarity::Stationary => "Stationary",
            Stationarity::NonStationary => "Non-stationary",
        }
    }
}

/// Augmented Dickey-Fuller outcome for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfOutcome {
    pub name: String,
    /// t-statistic on the lagged-level coefficient.
    pub statistic: f64,
    /// MacKinnon approximate p-value under the unit-root null.
    pub p_value: f64,
    /// Number of lagged differences included in the regression.
    pub lags: usize,
    /// Observations actually used after lag trimming.
    pub nobs: usize,
    /// Asymptotic critical values at 1% / 5% / 10%.
    pub critical_values: [f64; 3],
    pub conclusion: Stationarity,
}

/// One estimated parameter with its inference columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub z_stat: f64,
    pub p_value: f64,
}

/// Fitted ARX + GARCH(1,1) model. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarchFit {
    pub dependent: String,
    /// Intercept, AR(1) term, then one loading per exogenous regressor.
    pub mean: Vec<Coefficient>,
    /// omega, alpha[1], beta[1].
    pub variance: Vec<Coefficient>,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Observations in the likelihood (after the AR lag is consumed).
    pub nobs: usize,
    pub iterations: usize,
    /// Scale applied to y and X before fitting (coefficients are reported
    /// on the scaled data).
    pub scale: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let err = Series::new(
            "oil",
            vec![d(2020, 1, 2), d(2020, 1, 2)],
            vec![50.0, 51.0],
        );
        assert!(matches!(err, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn series_rejects_length_mismatch() {
        let err = Series::new("oil", vec![d(2020, 1, 2)], vec![50.0, 51.0]);
        assert!(matches!(err, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn stationarity_threshold_is_strict() {
        assert_eq!(
            Stationarity::from_p_value(0.049, 0.05),
            Stationarity::Stationary
        );
        assert_eq!(
            Stationarity::from_p_value(0.05, 0.05),
            Stationarity::NonStationary
        );
    }
}
