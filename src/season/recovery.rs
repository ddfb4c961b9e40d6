//! Amplitude / peak / trough recovery from a harmonic coefficient pair.
//!
//! A single-cycle harmonic regression contributes
//!
//! ```text
//! s · sin(2π·d/P) + c · cos(2π·d/P)
//! ```
//!
//! to the linear predictor. Rewritten as one sinusoid this is
//! `A · sin(2π·d/P + φ)` with `A = √(s² + c²)`, so the amplitude is exact and
//! only the phase needs care.
//!
//! The phase is taken from the ONE-argument arctangent of `s / c`, which only
//! covers half the circle. The quadrant is then resolved in two explicit
//! steps: first by the sign of the raw phase, then by the sign of `s`. These
//! branch conditions are the contract (a zero raw phase takes the second
//! branch), so they must not be collapsed into `atan2`.
//!
//! Output days are left unwrapped. Working the branches through, they always
//! land in `(0, P]`.

use std::f64::consts::PI;

use crate::domain::{HarmonicFit, SeasonalSummary};
use crate::error::SeasonalError;

/// Convert a sine/cosine coefficient pair into amplitude, peak day and trough day.
///
/// The amplitude comes from `f64::hypot`, so it may differ from
/// `(s * s + c * c).sqrt()` in the last ulp; it stays finite where the
/// literal formula overflows.
///
/// # Errors
/// - [`SeasonalError::InvalidConfiguration`] if `period_days` is not finite and positive.
/// - [`SeasonalError::InvalidInput`] if either coefficient is NaN or infinite.
pub fn recover_seasonal_summary(
    sin_coefficient: f64,
    cos_coefficient: f64,
    period_days: f64,
) -> Result<SeasonalSummary, SeasonalError> {
    if !(period_days.is_finite() && period_days > 0.0) {
        return Err(SeasonalError::InvalidConfiguration { period_days });
    }
    if !sin_coefficient.is_finite() {
        return Err(SeasonalError::InvalidInput {
            name: "sine",
            value: sin_coefficient,
        });
    }
    if !cos_coefficient.is_finite() {
        return Err(SeasonalError::InvalidInput {
            name: "cosine",
            value: cos_coefficient,
        });
    }

    // hypot is √(s² + c²) without intermediate overflow for huge coefficients.
    // It can differ from the literal formula in the last ulp.
    let amplitude = sin_coefficient.hypot(cos_coefficient);

    let phase = raw_phase(sin_coefficient, cos_coefficient, period_days);
    let half = period_days / 2.0;

    let (mut peak_day, mut trough_day) = if phase > 0.0 {
        (phase, phase + half)
    } else {
        (phase + half, phase + period_days)
    };

    if sin_coefficient < 0.0 {
        std::mem::swap(&mut peak_day, &mut trough_day);
    }

    Ok(SeasonalSummary {
        amplitude,
        peak_day,
        trough_day,
    })
}

/// [`recover_seasonal_summary`] for an already-assembled coefficient pair.
pub fn recover(fit: &HarmonicFit) -> Result<SeasonalSummary, SeasonalError> {
    recover_seasonal_summary(fit.sin_coefficient, fit.cos_coefficient, fit.period_days)
}

/// `atan(s / c)` expressed in days.
///
/// `c == 0` is the limit of `atan(x)` as `x → ±∞`, i.e. a quarter period with
/// the sign of `s`. Both coefficients zero gives a zero phase.
fn raw_phase(sin_coefficient: f64, cos_coefficient: f64, period_days: f64) -> f64 {
    if cos_coefficient == 0.0 {
        let quarter = period_days / 4.0;
        return if sin_coefficient > 0.0 {
            quarter
        } else if sin_coefficient < 0.0 {
            -quarter
        } else {
            0.0
        };
    }

    (sin_coefficient / cos_coefficient).atan() * period_days / (2.0 * PI)
}
