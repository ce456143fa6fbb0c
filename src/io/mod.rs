//! Result persistence: the xlsx report and debug CSV exports.

pub mod export;
pub mod workbook;

pub use export::*;
pub use workbook::*;
