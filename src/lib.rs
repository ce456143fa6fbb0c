//! `commodity-garch` library crate.
//!
//! Batch analysis of commodity-price exposure: download daily futures
//! closes, transform to log returns, align on trading dates, test each
//! series for stationarity, and fit an ARX + GARCH(1,1) volatility model
//! of index returns on the commodity returns.
//!
//! The binary (`cgarch`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (notebooks, batch schedulers, future services)

pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod garch;
pub mod io;
pub mod math;
pub mod report;
pub mod stats;
