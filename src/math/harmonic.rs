//! Basis functions for a single-cycle harmonic term.
//!
//! A day `d` on a cycle of length `P` maps to the angle `θ = 2π·d/P`. The two
//! regression covariates are then:
//!
//! - `sin_term(d, P) = sin(θ)`
//! - `cos_term(d, P) = cos(θ)`
//!
//! Numerical notes:
//! - The angle is reduced with `rem_euclid(P)` first, so large day indices
//!   (multi-year series) keep full precision in `sin`/`cos`.

use std::f64::consts::TAU;

use crate::domain::HarmonicFit;

/// Angle in radians of `day` on a cycle of `period` days.
pub fn angular_position(day: f64, period: f64) -> f64 {
    TAU * day.rem_euclid(period) / period
}

pub fn sin_term(day: f64, period: f64) -> f64 {
    angular_position(day, period).sin()
}

pub fn cos_term(day: f64, period: f64) -> f64 {
    angular_position(day, period).cos()
}

/// Contribution of the harmonic pair to the linear predictor on `day`.
pub fn seasonal_effect(fit: &HarmonicFit, day: f64) -> f64 {
    fit.sin_coefficient * sin_term(day, fit.period_days)
        + fit.cos_coefficient * cos_term(day, fit.period_days)
}
