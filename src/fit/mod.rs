//! Harmonic regression fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit the harmonic regression per region mode (parallel for per-region fits)
//! - judge whether the seasonal terms are supported (BIC comparison)

pub mod evidence;
pub mod harmonic;

pub use evidence::*;
pub use harmonic::*;
