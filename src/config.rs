//! Run configuration.
//!
//! There is no flag surface: a run is configured by editing
//! [`RunConfig::default`], which reproduces the original study
//! (S&P Southeast Asia 40 index returns vs Brent, coal, and natural-gas
//! futures, daily, 2020-2023). All the knobs that varied between the
//! original near-duplicate runs — date range, instrument set, file paths,
//! trend, significance — live here so the pipeline itself stays generic.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::{SeriesForm, Trend};

/// Where one input series comes from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Delimited file with a `Date` index column; `column` selects the
    /// value column (first non-date column when `None`).
    LocalCsv { path: PathBuf, column: Option<String> },
    /// Remote daily download by ticker symbol.
    Remote { ticker: String },
}

/// One named input: where it comes from and whether it still needs the
/// log-return transform.
#[derive(Debug, Clone)]
pub struct InputSpec {
    /// Column name used in every table and report.
    pub name: String,
    pub source: Source,
    pub form: SeriesForm,
}

/// A full run's configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Sample start (inclusive).
    pub start: NaiveDate,
    /// Sample end (inclusive).
    pub end: NaiveDate,
    /// Sampling interval for remote downloads (daily data: "1d").
    pub interval: String,
    pub inputs: Vec<InputSpec>,
    /// Name of the dependent column for the volatility model; every other
    /// column becomes an exogenous regressor.
    pub dependent: String,

    /// Deterministic terms in the unit-root regression.
    pub trend: Trend,
    /// Fixed lag order for the unit-root regression; AIC selection when
    /// `None`.
    pub adf_lags: Option<usize>,
    /// Significance level for the stationarity classification.
    pub significance: f64,

    /// Constant factor applied to y and X before the volatility fit.
    /// Daily log returns are O(1e-2); rescaling to O(1) keeps the
    /// optimizer away from a nearly-flat likelihood. Reported
    /// coefficients are on the scaled data.
    pub scale: f64,

    /// Workbook output path.
    pub output: PathBuf,
    /// Optional aligned-returns CSV for debugging.
    pub debug_export: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid literal date"),
            end: NaiveDate::from_ymd_opt(2023, 12, 29).expect("valid literal date"),
            interval: "1d".to_string(),
            inputs: vec![
                InputSpec {
                    name: "S&P SEA 40 Index".to_string(),
                    source: Source::LocalCsv {
                        path: PathBuf::from("data/snp40_index_return.csv"),
                        column: None,
                    },
                    form: SeriesForm::Returns,
                },
                InputSpec {
                    name: "Crude Oil".to_string(),
                    source: Source::Remote { ticker: "BZ=F".to_string() },
                    form: SeriesForm::Prices,
                },
                InputSpec {
                    name: "Coal".to_string(),
                    source: Source::Remote { ticker: "MTFZ24.NYM".to_string() },
                    form: SeriesForm::Prices,
                },
                InputSpec {
                    name: "Natural Gas".to_string(),
                    source: Source::Remote { ticker: "NG=F".to_string() },
                    form: SeriesForm::Prices,
                },
            ],
            dependent: "S&P SEA 40 Index".to_string(),
            trend: Trend::Constant,
            adf_lags: None,
            significance: 0.05,
            scale: 100.0,
            output: PathBuf::from("output/processed_output.xlsx"),
            debug_export: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_names_a_valid_dependent() {
        let config = RunConfig::default();
        assert!(config.inputs.iter().any(|i| i.name == config.dependent));
    }

    #[test]
    fn default_config_covers_the_study_window() {
        let config = RunConfig::default();
        assert!(config.start < config.end);
        assert_eq!(config.interval, "1d");
        assert_eq!(config.significance, 0.05);
    }
}
