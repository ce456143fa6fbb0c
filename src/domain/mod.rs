//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the date-indexed `Series` record and the joined `AlignedFrame`
//! - descriptive-summary and stationarity-result records
//! - volatility-model fit outputs (`GarchFit`, `Coefficient`)

pub mod types;

pub use types::*;
