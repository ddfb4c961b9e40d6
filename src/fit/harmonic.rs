//! Harmonic regression fitting.
//!
//! Given:
//! - daily observations (day-of-year, year index, region, count)
//! - a response scale (`ModelKind`)
//! - a design layout (which columns to carry)
//!
//! we build the design matrix, solve the OLS problem through
//! `math::solve_least_squares`, and report coefficients with standard errors
//! plus the sin/cos pair as a `HarmonicFit`.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{
    Coefficient, FitConfig, FitQuality, HarmonicFit, HarmonicRegressionFit, ModelKind, Observation,
    RegionMode, SeasonalityEvidence,
};
use crate::error::AppError;
use crate::fit::evidence::seasonality_evidence;
use crate::math::{coefficient_std_errors, solve_least_squares};
use crate::models::{DesignLayout, fill_design_row};

/// Minimum number of extra observations beyond parameter count.
pub const MIN_N_BUFFER: usize = 5;

/// Fits for every group the region mode produces, with matching evidence.
#[derive(Debug, Clone)]
pub struct HarmonicFits {
    pub fits: Vec<HarmonicRegressionFit>,
    pub evidence: Vec<SeasonalityEvidence>,
}

/// Fit one harmonic regression over `observations`.
pub fn fit_harmonic(
    observations: &[Observation],
    model: ModelKind,
    layout: &DesignLayout,
    region: Option<usize>,
) -> Result<HarmonicRegressionFit, AppError> {
    let n = observations.len();
    let k = layout.width();
    if n < k + MIN_N_BUFFER {
        return Err(AppError::new(
            3,
            format!("Underdetermined: n={n} < k+{MIN_N_BUFFER}={}", k + MIN_N_BUFFER),
        ));
    }

    let mut x = DMatrix::<f64>::zeros(n, k);
    let mut y = DVector::<f64>::zeros(n);
    let mut row = vec![0.0; k];

    for (i, obs) in observations.iter().enumerate() {
        fill_design_row(layout, obs, &mut row);
        for (j, value) in row.iter().enumerate() {
            x[(i, j)] = *value;
        }
        y[i] = model.response(obs.count);
    }

    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        AppError::new(
            4,
            format!("Least squares solve failed for the {} model.", model.display_name()),
        )
    })?;

    let residuals = &y - &x * &beta;
    let sse = residuals.norm_squared();
    let std_errors = coefficient_std_errors(&x, &residuals);
    if std_errors.is_none() {
        debug!(n, k, "standard errors unavailable (singular design)");
    }

    let coefficients: Vec<Coefficient> = layout
        .column_names()
        .into_iter()
        .enumerate()
        .map(|(j, name)| Coefficient {
            name,
            estimate: beta[j],
            std_error: std_errors.as_ref().map(|se| se[j]),
        })
        .collect();

    let harmonic = if layout.include_harmonic {
        HarmonicFit::new(beta[2], beta[3], layout.period_days)
    } else {
        HarmonicFit::new(0.0, 0.0, layout.period_days)
    };

    Ok(HarmonicRegressionFit {
        model,
        region,
        reference_region: layout.reference_region,
        coefficients,
        harmonic,
        quality: FitQuality {
            sse,
            rmse: (sse / n as f64).sqrt(),
            bic: bic(n, sse, k),
            n,
        },
    })
}

/// Fit according to `config.region_mode`.
///
/// Per-region fits run in parallel and come back ordered by region.
pub fn fit_all(observations: &[Observation], config: &FitConfig) -> Result<HarmonicFits, AppError> {
    if observations.is_empty() {
        return Err(AppError::new(3, "No observations to fit."));
    }

    let groups: Vec<(Option<usize>, Vec<Observation>)> = match config.region_mode {
        RegionMode::Pooled | RegionMode::Fixed => vec![(None, observations.to_vec())],
        RegionMode::PerRegion => group_by_region(observations)
            .into_iter()
            .map(|(region, obs)| (Some(region), obs))
            .collect(),
    };

    let outcomes: Vec<(HarmonicRegressionFit, SeasonalityEvidence)> = groups
        .par_iter()
        .map(|(region, obs)| {
            let layout = DesignLayout::for_observations(obs, config.region_mode, config.period_days);
            let fit = fit_harmonic(obs, config.model, &layout, *region)?;
            let evidence = seasonality_evidence(obs, config.model, &layout, &fit)?;
            info!(
                region = ?region,
                n = fit.quality.n,
                sin = fit.harmonic.sin_coefficient,
                cos = fit.harmonic.cos_coefficient,
                delta_bic = evidence.delta_bic,
                "fitted harmonic regression"
            );
            Ok((fit, evidence))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let (fits, evidence) = outcomes.into_iter().unzip();
    Ok(HarmonicFits { fits, evidence })
}

/// `n · ln(SSE/n) + k · ln(n)`.
pub fn bic(n: usize, sse: f64, k: usize) -> f64 {
    let n_f = n as f64;
    let sse_per = (sse / n_f).max(1e-12);
    n_f * sse_per.ln() + (k as f64) * n_f.ln()
}

fn group_by_region(observations: &[Observation]) -> Vec<(usize, Vec<Observation>)> {
    let mut regions: Vec<usize> = observations.iter().map(|o| o.region).collect();
    regions.sort_unstable();
    regions.dedup();

    regions
        .into_iter()
        .map(|region| {
            let obs = observations
                .iter()
                .filter(|o| o.region == region)
                .cloned()
                .collect();
            (region, obs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::data::simulate;
    use crate::domain::{RegionEffects, SimConfig};

    fn sim_config() -> SimConfig {
        SimConfig {
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            years: 3,
            regions: 3,
            baseline_log_rate: 5.0,
            trend_per_year: 0.05,
            seasonal_sin: 0.5,
            seasonal_cos: -0.25,
            period_days: 365.0,
            region_effects: RegionEffects::Fixed(vec![0.0, 0.3, -0.2]),
            seed: 11,
        }
    }

    fn fit_config(model: ModelKind, region_mode: RegionMode) -> FitConfig {
        FitConfig {
            model,
            region_mode,
            period_days: 365.0,
            data_path: None,
            export_summary: None,
            export_data: None,
            json: false,
        }
    }

    #[test]
    fn log_linear_fixed_effects_recover_truth() {
        let data = simulate(&sim_config()).unwrap();
        let fits = fit_all(&data.observations, &fit_config(ModelKind::LogLinear, RegionMode::Fixed)).unwrap();
        assert_eq!(fits.fits.len(), 1);

        let fit = &fits.fits[0];
        assert_approx_eq!(fit.harmonic.sin_coefficient, 0.5, 0.05);
        assert_approx_eq!(fit.harmonic.cos_coefficient, -0.25, 0.05);
        assert_approx_eq!(fit.coefficient("trend").unwrap().estimate, 0.05, 0.03);
        assert_approx_eq!(fit.coefficient("region_1").unwrap().estimate, 0.3, 0.05);
        assert_approx_eq!(fit.coefficient("region_2").unwrap().estimate, -0.2, 0.05);
        assert!(fit.coefficient("sin").unwrap().std_error.unwrap() > 0.0);
        assert!(fits.evidence[0].supported);
    }

    #[test]
    fn per_region_fits_are_ordered_by_region() {
        let data = simulate(&sim_config()).unwrap();
        let fits = fit_all(&data.observations, &fit_config(ModelKind::LogLinear, RegionMode::PerRegion)).unwrap();
        let regions: Vec<Option<usize>> = fits.fits.iter().map(|f| f.region).collect();
        assert_eq!(regions, vec![Some(0), Some(1), Some(2)]);
        for fit in &fits.fits {
            assert_eq!(fit.quality.n, 1096);
            assert!(fit.coefficient("region_1").is_none());
            assert_approx_eq!(fit.harmonic.sin_coefficient, 0.5, 0.06);
        }
    }

    #[test]
    fn linear_model_keeps_peak_timing() {
        let data = simulate(&sim_config()).unwrap();
        let fits = fit_all(&data.observations, &fit_config(ModelKind::Linear, RegionMode::Pooled)).unwrap();
        let fit = &fits.fits[0];
        // On the count scale the pair is much larger than on the log scale, but
        // the sine dominates with the same sign.
        assert!(fit.harmonic.sin_coefficient > 10.0);
        assert!(fit.harmonic.cos_coefficient < 0.0);
    }

    #[test]
    fn too_few_observations_is_insufficient_data() {
        let data = simulate(&sim_config()).unwrap();
        let few = &data.observations[..6];
        let layout = DesignLayout::for_observations(few, RegionMode::Pooled, 365.0);
        let err = fit_harmonic(few, ModelKind::Linear, &layout, None).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        let err = fit_all(&[], &fit_config(ModelKind::Linear, RegionMode::Pooled)).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn bic_penalises_extra_parameters() {
        assert!(bic(100, 50.0, 4) > bic(100, 50.0, 2));
        assert!(bic(100, 10.0, 4) < bic(100, 50.0, 4));
    }
}
