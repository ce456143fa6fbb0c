//! Input acquisition: remote market data and local CSV files.

pub mod local;
pub mod yahoo;

pub use local::*;
pub use yahoo::*;
