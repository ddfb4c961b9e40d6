//! Synthetic surveillance counts with a known, hand-chosen structure.
//!
//! For every day in the window and every region:
//!
//! ```text
//! log λ = baseline + trend · year_index
//!       + s · sin(2π·doy/P) + c · cos(2π·doy/P)
//!       + region_effect
//! count ~ Poisson(λ)
//! ```
//!
//! Randomness is always injected. `simulate` seeds a `StdRng` from the config;
//! tests and callers that need a specific stream use `simulate_with_rng`.

use chrono::{Datelike, Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Normal, Poisson};
use tracing::debug;

use crate::domain::{HarmonicFit, Observation, RegionEffects, SimConfig, SimulationTruth};
use crate::error::AppError;
use crate::math::{cos_term, sin_term};

/// Rates below this are clamped before sampling (Poisson needs λ > 0).
const MIN_RATE: f64 = 1e-9;

/// Average calendar year length used for the trend covariate.
const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone)]
pub struct SimulatedData {
    pub observations: Vec<Observation>,
    pub truth: SimulationTruth,
}

/// Simulate with a `StdRng` seeded from `config.seed`.
pub fn simulate(config: &SimConfig) -> Result<SimulatedData, AppError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    simulate_with_rng(config, &mut rng)
}

/// Simulate drawing from the supplied random source.
pub fn simulate_with_rng<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Result<SimulatedData, AppError> {
    validate(config)?;

    let months = config
        .years
        .checked_mul(12)
        .ok_or_else(|| AppError::new(2, format!("Simulation length of {} years is too large.", config.years)))?;
    let end_date = config
        .start_date
        .checked_add_months(Months::new(months))
        .ok_or_else(|| AppError::new(2, "Simulation window runs past the supported date range."))?;

    let n_days = (end_date - config.start_date).num_days().max(0) as usize;
    let n_rows = n_days.checked_mul(config.regions).ok_or_else(|| {
        AppError::new(
            2,
            format!("{n_days} days x {} regions is too many observations.", config.regions),
        )
    })?;

    let region_effects = realise_region_effects(&config.region_effects, config.regions, rng)?;
    let mut observations = Vec::with_capacity(n_rows);

    for date in config.start_date.iter_days().take(n_days) {
        let day_of_year = date.ordinal();
        let year_index = year_index(config.start_date, date);
        let day = f64::from(day_of_year);
        let seasonal = config.seasonal_sin * sin_term(day, config.period_days)
            + config.seasonal_cos * cos_term(day, config.period_days);

        for (region, effect) in region_effects.iter().enumerate() {
            let log_rate = config.baseline_log_rate + config.trend_per_year * year_index + seasonal + effect;
            let rate = log_rate.exp().max(MIN_RATE);
            if !rate.is_finite() {
                return Err(AppError::new(
                    2,
                    format!("Simulated rate overflows on {date} (log rate {log_rate:.2})."),
                ));
            }

            let poisson = Poisson::new(rate)
                .map_err(|e| AppError::new(4, format!("Count distribution error: {e}")))?;
            let count = poisson.sample(rng) as u64;

            observations.push(Observation {
                date,
                day_of_year,
                year_index,
                region,
                count,
            });
        }
    }

    debug!(
        days = n_days,
        regions = config.regions,
        observations = observations.len(),
        "simulated surveillance counts"
    );

    Ok(SimulatedData {
        observations,
        truth: SimulationTruth {
            baseline_log_rate: config.baseline_log_rate,
            trend_per_year: config.trend_per_year,
            harmonic: HarmonicFit::new(config.seasonal_sin, config.seasonal_cos, config.period_days),
            region_effects,
        },
    })
}

/// Fractional years elapsed between `start` and `date`.
pub fn year_index(start: NaiveDate, date: NaiveDate) -> f64 {
    (date - start).num_days() as f64 / DAYS_PER_YEAR
}

fn validate(config: &SimConfig) -> Result<(), AppError> {
    if config.years == 0 {
        return Err(AppError::new(2, "Simulation must cover at least one year."));
    }
    if config.regions == 0 {
        return Err(AppError::new(2, "Simulation needs at least one region."));
    }
    if !(config.period_days.is_finite() && config.period_days > 0.0) {
        return Err(AppError::new(
            2,
            format!("Invalid period length: {} (must be finite and > 0).", config.period_days),
        ));
    }
    let params = [
        ("baseline log rate", config.baseline_log_rate),
        ("trend", config.trend_per_year),
        ("seasonal sine", config.seasonal_sin),
        ("seasonal cosine", config.seasonal_cos),
    ];
    for (name, value) in params {
        if !value.is_finite() {
            return Err(AppError::new(2, format!("Invalid {name}: {value} (must be finite).")));
        }
    }

    match &config.region_effects {
        RegionEffects::Fixed(effects) => {
            if effects.len() != config.regions {
                return Err(AppError::new(
                    2,
                    format!(
                        "Got {} region effects for {} regions.",
                        effects.len(),
                        config.regions
                    ),
                ));
            }
            if effects.iter().any(|v| !v.is_finite()) {
                return Err(AppError::new(2, "Region effects must be finite."));
            }
        }
        RegionEffects::Random { sd } => {
            if !(sd.is_finite() && *sd >= 0.0) {
                return Err(AppError::new(
                    2,
                    format!("Invalid region effect sd: {sd} (must be finite and >= 0)."),
                ));
            }
        }
    }

    Ok(())
}

fn realise_region_effects<R: Rng + ?Sized>(
    effects: &RegionEffects,
    regions: usize,
    rng: &mut R,
) -> Result<Vec<f64>, AppError> {
    match effects {
        RegionEffects::Fixed(values) => Ok(values.clone()),
        RegionEffects::Random { sd } => {
            let normal = Normal::new(0.0, *sd)
                .map_err(|e| AppError::new(4, format!("Region effect distribution error: {e}")))?;
            Ok((0..regions).map(|_| normal.sample(rng)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SimConfig {
        SimConfig {
            start_date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            years: 2,
            regions: 3,
            baseline_log_rate: 3.0,
            trend_per_year: 0.1,
            seasonal_sin: 0.6,
            seasonal_cos: -0.3,
            period_days: 365.0,
            region_effects: RegionEffects::Fixed(vec![0.0, 0.4, -0.4]),
            seed: 7,
        }
    }

    #[test]
    fn covers_every_day_and_region() {
        let data = simulate(&base_config()).unwrap();
        // 2019 + 2020 (leap year) = 731 days.
        assert_eq!(data.observations.len(), 731 * 3);

        let first = &data.observations[0];
        assert_eq!(first.day_of_year, 1);
        assert_eq!(first.year_index, 0.0);
        assert_eq!(first.region, 0);

        let last = data.observations.last().unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
        assert_eq!(last.day_of_year, 366);
        assert_eq!(last.region, 2);
    }

    #[test]
    fn same_seed_same_counts() {
        let a = simulate(&base_config()).unwrap();
        let b = simulate(&base_config()).unwrap();
        assert_eq!(a.observations, b.observations);

        let mut other = base_config();
        other.seed = 8;
        let c = simulate(&other).unwrap();
        assert_ne!(a.observations, c.observations);
    }

    #[test]
    fn injected_rng_is_used() {
        let config = base_config();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let injected = simulate_with_rng(&config, &mut rng).unwrap();
        assert_eq!(injected.observations, simulate(&config).unwrap().observations);
    }

    #[test]
    fn truth_records_hand_chosen_parameters() {
        let data = simulate(&base_config()).unwrap();
        assert_eq!(data.truth.harmonic, HarmonicFit::new(0.6, -0.3, 365.0));
        assert_eq!(data.truth.region_effects, vec![0.0, 0.4, -0.4]);
    }

    #[test]
    fn random_region_effects_are_drawn_once_per_region() {
        let mut config = base_config();
        config.region_effects = RegionEffects::Random { sd: 0.5 };
        let data = simulate(&config).unwrap();
        assert_eq!(data.truth.region_effects.len(), 3);
        assert!(data.truth.region_effects.iter().all(|v| v.is_finite()));

        let mut zero = base_config();
        zero.region_effects = RegionEffects::Random { sd: 0.0 };
        let data = simulate(&zero).unwrap();
        assert!(data.truth.region_effects.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn seasonal_peak_shows_in_counts() {
        let mut config = base_config();
        config.trend_per_year = 0.0;
        config.region_effects = RegionEffects::Fixed(vec![0.0; 3]);
        config.seasonal_sin = 1.0;
        config.seasonal_cos = 0.0;
        let data = simulate(&config).unwrap();

        // sin peaks near day 91, troughs near day 274.
        let mean_near = |lo: u32, hi: u32| {
            let counts: Vec<f64> = data
                .observations
                .iter()
                .filter(|o| o.day_of_year >= lo && o.day_of_year <= hi)
                .map(|o| o.count as f64)
                .collect();
            counts.iter().sum::<f64>() / counts.len() as f64
        };
        assert!(mean_near(80, 100) > 2.0 * mean_near(265, 285));
    }

    #[test]
    fn oversized_window_is_a_configuration_error() {
        let mut config = base_config();
        config.years = 357_913_942;
        let err = simulate(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let mut config = base_config();
        config.regions = usize::MAX;
        config.region_effects = RegionEffects::Random { sd: 0.0 };
        let err = simulate(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("too many observations"));
    }

    #[test]
    fn overflowing_rate_is_a_configuration_error() {
        let mut config = base_config();
        config.baseline_log_rate = 1000.0;
        let err = simulate(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("overflows"));
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut c = base_config();
        c.years = 0;
        assert_eq!(simulate(&c).unwrap_err().exit_code(), 2);

        let mut c = base_config();
        c.period_days = 0.0;
        assert_eq!(simulate(&c).unwrap_err().exit_code(), 2);

        let mut c = base_config();
        c.region_effects = RegionEffects::Fixed(vec![0.0]);
        assert_eq!(simulate(&c).unwrap_err().exit_code(), 2);

        let mut c = base_config();
        c.region_effects = RegionEffects::Random { sd: -1.0 };
        assert_eq!(simulate(&c).unwrap_err().exit_code(), 2);

        let mut c = base_config();
        c.seasonal_sin = f64::NAN;
        assert_eq!(simulate(&c).unwrap_err().exit_code(), 2);
    }
}
