//! Mathematical utilities: least squares and the simplex minimizer.

pub mod nelder;
pub mod ols;

pub use nelder::*;
pub use ols::*;
