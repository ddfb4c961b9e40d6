//! Shared "fit pipeline" logic used by the `fit` command and its tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! simulate or ingest -> fit per region mode -> recover seasonal summaries
//! -> seasonality evidence -> compare to truth (simulated data only)

use tracing::info;

use crate::data::simulate;
use crate::domain::{
    FitConfig, HarmonicRegressionFit, Observation, SeasonalSummary, SeasonalityEvidence, SimConfig,
    SimulationTruth, SummaryFile,
};
use crate::error::AppError;
use crate::io::ingest::{RowError, load_observations};
use crate::report::{TruthComparison, compare_to_truth, seasonal_summaries};

/// All computed outputs of a single `season fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub observations: Vec<Observation>,
    /// Rows skipped while ingesting `--data` (empty for simulated runs).
    pub row_errors: Vec<RowError>,
    pub fits: Vec<HarmonicRegressionFit>,
    pub summaries: Vec<SeasonalSummary>,
    pub evidence: Vec<SeasonalityEvidence>,
    pub truth: Option<SimulationTruth>,
    pub comparisons: Vec<TruthComparison>,
}

impl RunOutput {
    /// The portable JSON record of this run.
    pub fn summary_file(&self, config: &FitConfig) -> SummaryFile {
        SummaryFile {
            tool: "season".to_string(),
            model: config.model,
            region_mode: config.region_mode,
            fits: self.fits.clone(),
            summaries: self.summaries.clone(),
            evidence: self.evidence.clone(),
            truth: self.truth.clone(),
        }
    }
}

/// Execute the full fitting pipeline and return the computed outputs.
///
/// Observations come from `config.data_path` when set, otherwise they are
/// simulated from `sim`.
pub fn run_fit(config: &FitConfig, sim: &SimConfig) -> Result<RunOutput, AppError> {
    if !(config.period_days.is_finite() && config.period_days > 0.0) {
        return Err(AppError::new(
            2,
            format!("Invalid period: {} (expected a finite value > 0).", config.period_days),
        ));
    }

    // 1) Acquire observations.
    let (observations, row_errors, truth) = match &config.data_path {
        Some(path) => {
            let ingest = load_observations(path)?;
            (ingest.observations, ingest.row_errors, None)
        }
        None => {
            let data = simulate(sim)?;
            (data.observations, Vec::new(), Some(data.truth))
        }
    };

    // 2) Fit + evidence.
    let fitted = crate::fit::fit_all(&observations, config)?;

    // 3) Back-transform sin/cos into amplitude, peak and trough.
    let summaries = seasonal_summaries(&fitted.fits)?;

    // 4) Truth comparison is only possible for simulated data.
    let comparisons = match &truth {
        Some(truth) => fitted
            .fits
            .iter()
            .map(|fit| compare_to_truth(fit, truth))
            .collect::<Result<Vec<_>, AppError>>()?,
        None => Vec::new(),
    };

    info!(
        observations = observations.len(),
        fits = fitted.fits.len(),
        simulated = truth.is_some(),
        "fit pipeline complete"
    );

    Ok(RunOutput {
        observations,
        row_errors,
        fits: fitted.fits,
        summaries,
        evidence: fitted.evidence,
        truth,
        comparisons,
    })
}
