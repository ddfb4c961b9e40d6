//! Harmonic regression design.
//!
//! Design rows are small, pure functions so that the fitting
//! code can stay generic over region handling.

pub mod model;

pub use model::*;
