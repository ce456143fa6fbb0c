//! Error taxonomy for the whole run.
//!
//! Every fatal condition maps to a distinct variant with its own process
//! exit code, so shell callers can tell "input file missing" apart from
//! "optimizer failed". Report-write failures are the one soft case: the
//! caller logs them and finishes, because the numeric results have already
//! been printed by then.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// A required local input file is absent or unreadable.
    #[error("[*] Missing input: {0}")]
    MissingInput(String),

    /// Input data violates a structural requirement (empty series,
    /// duplicate dates, unparsable rows).
    #[error("[*] Invalid input: {0}")]
    InvalidInput(String),

    /// Alignment produced zero usable rows.
    #[error("[*] Empty dataset: {0}")]
    EmptyDataset(String),

    /// Remote data fetch failed or returned nothing usable.
    #[error("[*] Download failed: {0}")]
    Download(String),

    /// The volatility-model optimizer did not converge, or the fit is
    /// degenerate (e.g. zero-variance dependent series).
    #[error("[*] Model did not converge: {0}")]
    Convergence(String),

    /// Report serialization failed. Callers degrade gracefully on this
    /// variant instead of aborting.
    #[error("[*] Report write failed: {0}")]
    Write(String),
}

impl PipelineError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::MissingInput(_) | PipelineError::InvalidInput(_) => 2,
            PipelineError::EmptyDataset(_) => 3,
            PipelineError::Download(_) => 4,
            PipelineError::Convergence(_) => 5,
            PipelineError::Write(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_fatal_class() {
        let missing = PipelineError::MissingInput("x".into());
        let empty = PipelineError::EmptyDataset("x".into());
        let download = PipelineError::Download("x".into());
        let convergence = PipelineError::Convergence("x".into());
        assert_ne!(missing.exit_code(), empty.exit_code());
        assert_ne!(empty.exit_code(), download.exit_code());
        assert_ne!(download.exit_code(), convergence.exit_code());
    }

    #[test]
    fn messages_carry_the_console_prefix() {
        let err = PipelineError::MissingInput("data/snp40_index_return.csv".into());
        assert!(err.to_string().starts_with("[*] "));
    }
}
