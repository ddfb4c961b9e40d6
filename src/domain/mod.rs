//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the harmonic coefficient pair and its seasonal summary (`HarmonicFit`, `SeasonalSummary`)
//! - simulated observations and their known truth (`Observation`, `SimConfig`, `SimulationTruth`)
//! - fit outputs (`HarmonicRegressionFit`, `FitQuality`, etc.)

pub mod types;

pub use types::*;
