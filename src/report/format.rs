//! Formatted terminal output and calendar display helpers.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! Recovered days are unwrapped reals. Wrapping into the cycle and rounding to
//! a whole day-of-year happens here, at display time only.

use chrono::NaiveDate;

use crate::domain::{HarmonicRegressionFit, SeasonalSummary, SeasonalityEvidence, SimulationTruth};
use crate::report::compare::TruthComparison;

/// Amplitudes at or below this are reported as "no seasonal signal".
pub const NEGLIGIBLE_AMPLITUDE: f64 = 1e-9;

/// Map a day onto `[0, period)`.
pub fn wrap_day(day: f64, period: f64) -> f64 {
    let wrapped = day.rem_euclid(period);
    // rem_euclid can round up to exactly `period` for tiny negative inputs.
    if wrapped >= period { 0.0 } else { wrapped }
}

/// Whole day-of-year for display: wrapped, rounded, with day 0 shown as `period`.
pub fn display_day(day: f64, period: f64) -> u32 {
    let rounded = wrap_day(day, period).round();
    let period_days = period.round().max(1.0);
    if rounded <= 0.0 || rounded > period_days {
        period_days as u32
    } else {
        rounded as u32
    }
}

/// Calendar date of a 1-based day-of-year in `year`, if that day exists.
pub fn day_to_date(year: i32, day_of_year: u32) -> Option<NaiveDate> {
    NaiveDate::from_yo_opt(year, day_of_year)
}

/// Format a single recovered summary.
///
/// With `wrap`, days are shown as whole days of the cycle; otherwise the raw
/// values are printed. `year` adds calendar dates.
pub fn format_summary(summary: &SeasonalSummary, period: f64, wrap: bool, year: Option<i32>) -> String {
    let mut out = String::new();

    out.push_str(&format!("Amplitude:  {:.4}\n", summary.amplitude));
    if summary.is_negligible(NEGLIGIBLE_AMPLITUDE) {
        out.push_str("(no detectable seasonal signal; peak/trough are not meaningful)\n");
    }

    for (label, day) in [("Peak day:  ", summary.peak_day), ("Trough day:", summary.trough_day)] {
        if wrap {
            let shown = display_day(day, period);
            out.push_str(&format!("{label} {shown}"));
            if let Some(date) = year.and_then(|y| day_to_date(y, shown)) {
                out.push_str(&format!(" ({})", date.format("%b %d")));
            }
            out.push('\n');
        } else {
            out.push_str(&format!("{label} {day:.3}\n"));
        }
    }

    out
}

/// Format the fitted coefficients, recovered seasonal summaries, and evidence.
pub fn format_fit_report(
    fits: &[HarmonicRegressionFit],
    summaries: &[SeasonalSummary],
    evidence: &[SeasonalityEvidence],
) -> String {
    let mut out = String::new();

    out.push_str("=== season - harmonic regression ===\n");
    for ((fit, summary), ev) in fits.iter().zip(summaries).zip(evidence) {
        let period = fit.harmonic.period_days;
        match fit.region {
            Some(region) => out.push_str(&format!("\nRegion {region} ({} model)\n", fit.model.display_name())),
            None => out.push_str(&format!("\nAll regions ({} model)\n", fit.model.display_name())),
        }
        out.push_str(&format!(
            "n={} SSE={:.3} RMSE={:.4} BIC={:.3}\n",
            fit.quality.n, fit.quality.sse, fit.quality.rmse, fit.quality.bic
        ));

        out.push_str(format!("{:<12} {:>12} {:>12}", "term", "estimate", "std_err").trim_end());
        out.push('\n');
        out.push_str(format!("{:-<12} {:-<12} {:-<12}", "", "", "").trim_end());
        out.push('\n');
        for c in &fit.coefficients {
            let se = c.std_error.map(|v| format!("{v:.5}")).unwrap_or_else(|| "-".to_string());
            out.push_str(&format!("{:<12} {:>12.5} {:>12}\n", c.name, c.estimate, se));
        }

        out.push_str(&format!(
            "Seasonality: amplitude={:.4} peak=day {} trough=day {}\n",
            summary.amplitude,
            display_day(summary.peak_day, period),
            display_day(summary.trough_day, period),
        ));
        out.push_str(&format!(
            "Evidence: dBIC={:.2} ({})\n",
            ev.delta_bic,
            if ev.supported { "seasonal terms supported" } else { "no detectable seasonal signal" }
        ));
    }

    out
}

/// Format truth-vs-estimate tables for a simulated run.
pub fn format_comparison(truth: &SimulationTruth, comparisons: &[TruthComparison]) -> String {
    let mut out = String::new();
    let period = truth.harmonic.period_days;

    out.push_str("\nSimulation truth:\n");
    out.push_str(&format!(
        "- baseline log rate: {:.3} | trend/year: {:.3} | sin: {:.3} | cos: {:.3}\n",
        truth.baseline_log_rate,
        truth.trend_per_year,
        truth.harmonic.sin_coefficient,
        truth.harmonic.cos_coefficient
    ));

    for cmp in comparisons {
        match cmp.region {
            Some(region) => out.push_str(&format!("\nRecovered vs truth (region {region}):\n")),
            None => out.push_str("\nRecovered vs truth:\n"),
        }

        if !cmp.coefficients.is_empty() {
            out.push_str(format!("{:<12} {:>10} {:>10} {:>10} {:>8}", "term", "truth", "estimate", "diff", "in 95%").trim_end());
            out.push('\n');
            for c in &cmp.coefficients {
                let covered = match c.covered {
                    Some(true) => "yes",
                    Some(false) => "no",
                    None => "-",
                };
                out.push_str(&format!(
                    "{:<12} {:>10.4} {:>10.4} {:>10.4} {:>8}\n",
                    c.name, c.truth, c.estimate, c.difference, covered
                ));
            }
        }

        let s = &cmp.seasonal;
        out.push_str(&format!(
            "peak: truth=day {} estimate=day {} (shift {:.1} days)\n",
            display_day(s.truth.peak_day, period),
            display_day(s.estimate.peak_day, period),
            s.peak_shift_days
        ));
        if let Some(diff) = s.amplitude_difference {
            out.push_str(&format!(
                "amplitude: truth={:.4} estimate={:.4} (diff {:+.4})\n",
                s.truth.amplitude, s.estimate.amplitude, diff
            ));
        }
    }

    out
}
