//! Recovered coefficients against the simulation truth.
//!
//! Coefficient-level comparisons only make sense on the log scale the
//! simulator works in, so they are produced for `ModelKind::LogLinear` fits
//! only. Peak timing is scale-free and is compared for every model.

use serde::{Deserialize, Serialize};

use crate::domain::{HarmonicRegressionFit, ModelKind, SeasonalSummary, SimulationTruth};
use crate::error::AppError;
use crate::models::{COS, SIN, TREND, region_column};
use crate::season::recover;

/// Half-width of a 95% normal interval, in standard errors.
const Z_95: f64 = 1.96;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientComparison {
    pub name: String,
    pub truth: f64,
    pub estimate: f64,
    pub difference: f64,
    pub std_error: Option<f64>,
    /// Whether the truth lies within ±1.96·SE of the estimate.
    pub covered: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalComparison {
    pub truth: SeasonalSummary,
    pub estimate: SeasonalSummary,
    /// Only on the log scale.
    pub amplitude_difference: Option<f64>,
    /// Shortest distance between the two peaks around the cycle.
    pub peak_shift_days: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruthComparison {
    pub region: Option<usize>,
    pub coefficients: Vec<CoefficientComparison>,
    pub seasonal: SeasonalComparison,
}

/// Compare one fit with the parameters its data were simulated from.
pub fn compare_to_truth(fit: &HarmonicRegressionFit, truth: &SimulationTruth) -> Result<TruthComparison, AppError> {
    let log_scale = fit.model == ModelKind::LogLinear;

    let mut coefficients = Vec::new();
    if log_scale {
        let mut expected = vec![
            (TREND.to_string(), truth.trend_per_year),
            (SIN.to_string(), truth.harmonic.sin_coefficient),
            (COS.to_string(), truth.harmonic.cos_coefficient),
        ];
        expected.extend(region_contrasts(fit, truth));

        for (name, true_value) in expected {
            let Some(coefficient) = fit.coefficient(&name) else {
                continue;
            };
            let difference = coefficient.estimate - true_value;
            coefficients.push(CoefficientComparison {
                name,
                truth: true_value,
                estimate: coefficient.estimate,
                difference,
                std_error: coefficient.std_error,
                covered: coefficient.std_error.map(|se| difference.abs() <= Z_95 * se),
            });
        }
    }

    let truth_summary = recover(&truth.harmonic)?;
    let estimate_summary = recover(&fit.harmonic)?;

    Ok(TruthComparison {
        region: fit.region,
        coefficients,
        seasonal: SeasonalComparison {
            truth: truth_summary,
            estimate: estimate_summary,
            amplitude_difference: log_scale.then(|| estimate_summary.amplitude - truth_summary.amplitude),
            peak_shift_days: circular_distance(
                estimate_summary.peak_day,
                truth_summary.peak_day,
                truth.harmonic.period_days,
            ),
        },
    })
}

/// Shortest distance between two days on a cycle of `period` days.
pub fn circular_distance(a: f64, b: f64, period: f64) -> f64 {
    let d = (a - b).rem_euclid(period);
    d.min(period - d)
}

/// True region dummies: each region's offset relative to the reference region.
fn region_contrasts(fit: &HarmonicRegressionFit, truth: &SimulationTruth) -> Vec<(String, f64)> {
    let Some(reference_effect) = fit
        .reference_region
        .and_then(|r| truth.region_effects.get(r))
    else {
        return Vec::new();
    };

    truth
        .region_effects
        .iter()
        .enumerate()
        .filter(|(region, _)| Some(*region) != fit.reference_region)
        .map(|(region, effect)| (region_column(region), effect - reference_effect))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::domain::{Coefficient, FitQuality, HarmonicFit};

    fn truth() -> SimulationTruth {
        SimulationTruth {
            baseline_log_rate: 4.0,
            trend_per_year: 0.1,
            harmonic: HarmonicFit::annual(0.5, -0.2),
            region_effects: vec![0.0, 0.3, -0.1],
        }
    }

    fn coefficient(name: &str, estimate: f64, std_error: f64) -> Coefficient {
        Coefficient {
            name: name.to_string(),
            estimate,
            std_error: Some(std_error),
        }
    }

    fn fit(model: ModelKind, sin: f64, cos: f64) -> HarmonicRegressionFit {
        HarmonicRegressionFit {
            model,
            region: None,
            reference_region: Some(0),
            coefficients: vec![
                coefficient("intercept", 4.0, 0.01),
                coefficient("trend", 0.11, 0.01),
                coefficient("sin", sin, 0.01),
                coefficient("cos", cos, 0.01),
                coefficient("region_1", 0.5, 0.01),
                coefficient("region_2", -0.1, 0.01),
            ],
            harmonic: HarmonicFit::annual(sin, cos),
            quality: FitQuality {
                sse: 1.0,
                rmse: 0.1,
                bic: 0.0,
                n: 100,
            },
        }
    }

    #[test]
    fn log_linear_fit_compares_every_known_coefficient() {
        let cmp = compare_to_truth(&fit(ModelKind::LogLinear, 0.51, -0.2), &truth()).unwrap();
        let names: Vec<&str> = cmp.coefficients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["trend", "sin", "cos", "region_1", "region_2"]);

        let trend = &cmp.coefficients[0];
        assert_approx_eq!(trend.difference, 0.01, 1e-12);
        assert_eq!(trend.covered, Some(true));

        let region_1 = &cmp.coefficients[3];
        assert_approx_eq!(region_1.truth, 0.3, 1e-12);
        assert_eq!(region_1.covered, Some(false));

        assert!(cmp.seasonal.amplitude_difference.is_some());
        assert!(cmp.seasonal.peak_shift_days < 1.0);
    }

    #[test]
    fn linear_fit_only_compares_timing() {
        let cmp = compare_to_truth(&fit(ModelKind::Linear, 50.0, -20.0), &truth()).unwrap();
        assert!(cmp.coefficients.is_empty());
        assert!(cmp.seasonal.amplitude_difference.is_none());
        // Same direction of the pair, so the peak lands on the same day.
        assert_approx_eq!(cmp.seasonal.peak_shift_days, 0.0, 1e-9);
    }

    #[test]
    fn circular_distance_wraps() {
        assert_approx_eq!(circular_distance(360.0, 5.0, 365.0), 10.0, 1e-12);
        assert_approx_eq!(circular_distance(5.0, 360.0, 365.0), 10.0, 1e-12);
        assert_approx_eq!(circular_distance(100.0, 100.0, 365.0), 0.0, 1e-12);
        assert_approx_eq!(circular_distance(0.0, 182.5, 365.0), 182.5, 1e-12);
    }
}
