//! Synthetic dataset generation.

pub mod simulate;

pub use simulate::*;
