//! Reporting utilities: seasonal summaries per fit, truth comparisons, and
//! formatted terminal output.

pub mod compare;
pub mod format;

pub use compare::*;
pub use format::*;

use crate::domain::{HarmonicRegressionFit, SeasonalSummary};
use crate::error::AppError;
use crate::season::recover;

/// Recover the seasonal summary of every fit, in order.
pub fn seasonal_summaries(fits: &[HarmonicRegressionFit]) -> Result<Vec<SeasonalSummary>, AppError> {
    fits.iter()
        .map(|fit| recover(&fit.harmonic).map_err(AppError::from))
        .collect()
}
