//! Mathematical utilities: harmonic basis terms and least squares.

pub mod harmonic;
pub mod ols;

pub use harmonic::*;
pub use ols::*;
