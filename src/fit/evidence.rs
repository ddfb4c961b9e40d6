//! Does the harmonic pair earn its keep?
//!
//! The full model is compared with the same design minus the sin/cos columns:
//!
//! - BIC = n * ln(SSE/n) + k * ln(n)
//! - ΔBIC = BIC(trend only) - BIC(full)
//!
//! Seasonality counts as supported when ΔBIC exceeds 2, the usual
//! "positive evidence" cut-off.

use crate::domain::{HarmonicRegressionFit, ModelKind, Observation, SeasonalityEvidence};
use crate::error::AppError;
use crate::fit::harmonic::fit_harmonic;
use crate::models::DesignLayout;

/// Minimum ΔBIC for the seasonal terms to count as supported.
pub const DELTA_BIC_THRESHOLD: f64 = 2.0;

/// Compare an existing full fit against its trend-only counterpart.
pub fn seasonality_evidence(
    observations: &[Observation],
    model: ModelKind,
    layout: &DesignLayout,
    full: &HarmonicRegressionFit,
) -> Result<SeasonalityEvidence, AppError> {
    let reduced = fit_harmonic(observations, model, &layout.without_harmonic(), full.region)?;
    Ok(compare_bic(full.region, full.quality.bic, reduced.quality.bic))
}

fn compare_bic(region: Option<usize>, bic_full: f64, bic_trend_only: f64) -> SeasonalityEvidence {
    let delta_bic = bic_trend_only - bic_full;
    SeasonalityEvidence {
        region,
        bic_full,
        bic_trend_only,
        delta_bic,
        supported: delta_bic > DELTA_BIC_THRESHOLD,
    }
}
