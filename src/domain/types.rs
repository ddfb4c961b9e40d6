//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during simulation and fitting
//! - exported to JSON/CSV
//! - reloaded later for re-printing a saved summary

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Cycle length assumed by the harmonic terms unless configured otherwise.
pub const DEFAULT_PERIOD_DAYS: f64 = 365.0;

/// The sine/cosine coefficient pair of a single-cycle harmonic regression.
///
/// Constructed right after a fit and consumed by
/// [`recover_seasonal_summary`](crate::season::recover_seasonal_summary).
/// Every sign/zero combination of the coefficients is a valid value; only
/// `period_days` is constrained (`> 0`), and that is checked at recovery time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicFit {
    pub sin_coefficient: f64,
    pub cos_coefficient: f64,
    pub period_days: f64,
}

impl HarmonicFit {
    pub fn new(sin_coefficient: f64, cos_coefficient: f64, period_days: f64) -> Self {
        Self {
            sin_coefficient,
            cos_coefficient,
            period_days,
        }
    }

    /// Pair on the default 365-day cycle.
    #[cfg(test)]
    pub(crate) fn annual(sin_coefficient: f64, cos_coefficient: f64) -> Self {
        Self::new(sin_coefficient, cos_coefficient, DEFAULT_PERIOD_DAYS)
    }
}

/// Human-interpretable seasonal descriptors.
///
/// Days are real-valued and unwrapped; see `report::wrap_day` for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalSummary {
    pub amplitude: f64,
    pub peak_day: f64,
    pub trough_day: f64,
}

impl SeasonalSummary {
    /// True when the seasonal swing is too small for peak/trough to mean anything.
    pub fn is_negligible(&self, tolerance: f64) -> bool {
        self.amplitude <= tolerance.abs()
    }
}

/// Response scale of the harmonic regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// Ordinary least squares on raw counts.
    Linear,
    /// Ordinary least squares on `ln(count + 0.5)`.
    ///
    /// Coefficients live on the log scale, the same scale the simulator uses
    /// for its hand-chosen truth.
    LogLinear,
}

impl ModelKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::LogLinear => "log-linear",
        }
    }

    /// Transform an observed count into the regression response.
    pub fn response(self, count: u64) -> f64 {
        match self {
            ModelKind::Linear => count as f64,
            ModelKind::LogLinear => (count as f64 + 0.5).ln(),
        }
    }
}

/// How geographic regions enter the regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RegionMode {
    /// Ignore regions: one shared intercept.
    Pooled,
    /// One dummy column per non-reference region (the lowest region present is the reference).
    Fixed,
    /// Independent fit per region.
    PerRegion,
}

/// A single daily count for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// 1-based day of the calendar year.
    pub day_of_year: u32,
    /// Years elapsed since the first observation (fractional).
    pub year_index: f64,
    pub region: usize,
    pub count: u64,
}

/// Region-level offsets on the log-rate scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionEffects {
    /// Explicit offsets, one per region.
    Fixed(Vec<f64>),
    /// Offsets drawn once per region from `Normal(0, sd)`.
    Random { sd: f64 },
}

/// Hand-chosen structure for a synthetic surveillance dataset.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub start_date: NaiveDate,
    pub years: u32,
    pub regions: usize,
    pub baseline_log_rate: f64,
    pub trend_per_year: f64,
    pub seasonal_sin: f64,
    pub seasonal_cos: f64,
    pub period_days: f64,
    pub region_effects: RegionEffects,
    pub seed: u64,
}

/// The known parameters a simulated dataset was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTruth {
    pub baseline_log_rate: f64,
    pub trend_per_year: f64,
    pub harmonic: HarmonicFit,
    /// Realised per-region offsets (drawn values when effects are random).
    pub region_effects: Vec<f64>,
}

/// One estimated regression coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    /// `None` when the residual degrees of freedom do not allow an estimate.
    pub std_error: Option<f64>,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub bic: f64,
    pub n: usize,
}

/// Output of one harmonic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonicRegressionFit {
    pub model: ModelKind,
    /// Set for per-region fits.
    pub region: Option<usize>,
    /// Region absorbed by the intercept when region dummies are present.
    pub reference_region: Option<usize>,
    pub coefficients: Vec<Coefficient>,
    pub harmonic: HarmonicFit,
    pub quality: FitQuality,
}

impl HarmonicRegressionFit {
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }
}

/// BIC comparison of a fit against the same design without the harmonic pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalityEvidence {
    pub region: Option<usize>,
    pub bic_full: f64,
    pub bic_trend_only: f64,
    /// `bic_trend_only - bic_full`; positive favours the seasonal model.
    pub delta_bic: f64,
    pub supported: bool,
}

/// A full run's configuration as understood by the fit pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub model: ModelKind,
    pub region_mode: RegionMode,
    pub period_days: f64,

    /// Fit this CSV instead of simulating.
    pub data_path: Option<PathBuf>,

    pub export_summary: Option<PathBuf>,
    pub export_data: Option<PathBuf>,
    pub json: bool,
}

/// A saved summary file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryFile {
    pub tool: String,
    pub model: ModelKind,
    pub region_mode: RegionMode,
    pub fits: Vec<HarmonicRegressionFit>,
    pub summaries: Vec<SeasonalSummary>,
    pub evidence: Vec<SeasonalityEvidence>,
    pub truth: Option<SimulationTruth>,
}
