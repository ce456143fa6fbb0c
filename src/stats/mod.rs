//! The reusable numeric pipeline.
//!
//! - log-return transform (`returns`)
//! - date alignment + descriptive summary (`align`)
//! - Augmented Dickey-Fuller stationarity test (`adf`)

pub mod adf;
pub mod align;
pub mod returns;

pub use adf::*;
pub use align::*;
pub use returns::*;
