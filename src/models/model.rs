//! Design layout for the harmonic regression.
//!
//! The fitter builds one design row per observation and stacks them into the
//! OLS design matrix.
//!
//! Column order is fixed: intercept, trend, sin, cos, then one dummy per
//! non-reference region.

use crate::domain::{Observation, RegionMode};
use crate::math::{cos_term, sin_term};

pub const INTERCEPT: &str = "intercept";
pub const TREND: &str = "trend";
pub const SIN: &str = "sin";
pub const COS: &str = "cos";

/// Which columns a regression carries.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignLayout {
    pub period_days: f64,
    /// Drop the sin/cos pair (trend-only comparison model).
    pub include_harmonic: bool,
    /// Region absorbed by the intercept (fixed effects only).
    pub reference_region: Option<usize>,
    /// Regions that get a dummy column; the reference region is not listed.
    pub dummy_regions: Vec<usize>,
}

impl DesignLayout {
    /// Layout for a region mode over the given observations.
    ///
    /// With `RegionMode::Fixed`, the lowest region present is the reference.
    pub fn for_observations(observations: &[Observation], mode: RegionMode, period_days: f64) -> Self {
        let (reference_region, dummy_regions) = match mode {
            RegionMode::Fixed => {
                let mut regions: Vec<usize> = observations.iter().map(|o| o.region).collect();
                regions.sort_unstable();
                regions.dedup();
                let reference = regions.first().copied();
                (reference, regions.into_iter().skip(1).collect())
            }
            RegionMode::Pooled | RegionMode::PerRegion => (None, Vec::new()),
        };

        Self {
            period_days,
            include_harmonic: true,
            reference_region,
            dummy_regions,
        }
    }

    /// Same layout without the harmonic pair.
    pub fn without_harmonic(&self) -> Self {
        Self {
            include_harmonic: false,
            ..self.clone()
        }
    }

    pub fn width(&self) -> usize {
        let harmonic = if self.include_harmonic { 2 } else { 0 };
        2 + harmonic + self.dummy_regions.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec![INTERCEPT.to_string(), TREND.to_string()];
        if self.include_harmonic {
            names.push(SIN.to_string());
            names.push(COS.to_string());
        }
        names.extend(self.dummy_regions.iter().map(|r| region_column(*r)));
        names
    }
}

/// Column name for a region dummy.
pub fn region_column(region: usize) -> String {
    format!("region_{region}")
}

/// Fill a design row for one observation.
///
/// # Panics
/// Panics if `out` does not have length `layout.width()`. Callers should size
/// the row correctly.
pub fn fill_design_row(layout: &DesignLayout, obs: &Observation, out: &mut [f64]) {
    out[0] = 1.0;
    out[1] = obs.year_index;

    let mut col = 2;
    if layout.include_harmonic {
        let day = f64::from(obs.day_of_year);
        out[col] = sin_term(day, layout.period_days);
        out[col + 1] = cos_term(day, layout.period_days);
        col += 2;
    }

    for (j, region) in layout.dummy_regions.iter().enumerate() {
        out[col + j] = if obs.region == *region { 1.0 } else { 0.0 };
    }
}
