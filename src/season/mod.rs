//! Seasonal descriptors from harmonic regression coefficients.

pub mod recovery;

pub use recovery::*;
