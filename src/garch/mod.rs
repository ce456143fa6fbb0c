//! ARX mean / GARCH(1,1) variance model, fit by maximum likelihood.

pub mod fitter;

pub use fitter::*;
