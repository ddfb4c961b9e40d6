//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - recovers seasonal summaries from coefficient pairs
//! - simulates data and runs the harmonic regression pipeline
//! - prints reports and writes optional exports

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FitArgs, RecoverArgs, ShowArgs, SimArgs, SimulateArgs};
use crate::domain::{FitConfig, HarmonicFit, RegionEffects, SeasonalSummary, SimConfig};
use crate::error::AppError;
use crate::report::{compare_to_truth, format_comparison, format_fit_report, format_summary, wrap_day};

pub mod pipeline;

/// Entry point for the `season` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; clap falls back to defaults.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Recover(args) => handle_recover(&args),
        Command::Simulate(args) => handle_simulate(&args),
        Command::Fit(args) => handle_fit(&args),
        Command::Show(args) => handle_show(&args),
    }
}

/// Logs go to stderr so stdout only carries reports.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_recover(args: &RecoverArgs) -> Result<(), AppError> {
    let fit = HarmonicFit::new(args.sin, args.cos, args.period);
    let summary = crate::season::recover(&fit)?;
    let wrap = args.wrap || args.year.is_some();

    if args.json {
        let shown = if wrap {
            SeasonalSummary {
                amplitude: summary.amplitude,
                peak_day: wrap_day(summary.peak_day, args.period),
                trough_day: wrap_day(summary.trough_day, args.period),
            }
        } else {
            summary
        };
        println!("{}", to_json(&shown)?);
    } else {
        print!("{}", format_summary(&summary, args.period, wrap, args.year));
    }
    Ok(())
}

fn handle_simulate(args: &SimulateArgs) -> Result<(), AppError> {
    let config = sim_config_from_args(&args.sim);
    let data = crate::data::simulate(&config)?;
    crate::io::export::write_observations_csv(&args.out, &data.observations)?;

    println!(
        "Wrote {} observations ({} regions x {} years) to {}",
        data.observations.len(),
        config.regions,
        config.years,
        args.out.display()
    );
    println!(
        "Region effects: {}",
        data.truth
            .region_effects
            .iter()
            .map(|v| format!("{v:.3}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

fn handle_fit(args: &FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(args);
    let sim = sim_config_from_args(&args.sim);
    let run = pipeline::run_fit(&config, &sim)?;

    for err in &run.row_errors {
        warn!(line = err.line, "{}", err.message);
    }

    let summary_file = run.summary_file(&config);

    if config.json {
        println!("{}", to_json(&summary_file)?);
    } else {
        if config.data_path.is_some() {
            println!(
                "Loaded {} observations ({} rows skipped)",
                run.observations.len(),
                run.row_errors.len()
            );
        }
        print!("{}", format_fit_report(&run.fits, &run.summaries, &run.evidence));
        if let Some(truth) = &run.truth {
            print!("{}", format_comparison(truth, &run.comparisons));
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_summary {
        crate::io::summary::write_summary_json(path, &summary_file)?;
    }
    if let Some(path) = &config.export_data {
        crate::io::export::write_observations_csv(path, &run.observations)?;
    }

    Ok(())
}

fn handle_show(args: &ShowArgs) -> Result<(), AppError> {
    let summary = crate::io::summary::read_summary_json(&args.summary)?;
    debug!(tool = %summary.tool, fits = summary.fits.len(), "loaded summary JSON");

    print!("{}", format_fit_report(&summary.fits, &summary.summaries, &summary.evidence));
    if let Some(truth) = &summary.truth {
        let comparisons = summary
            .fits
            .iter()
            .map(|fit| compare_to_truth(fit, truth))
            .collect::<Result<Vec<_>, AppError>>()?;
        print!("{}", format_comparison(truth, &comparisons));
    }
    Ok(())
}

pub fn sim_config_from_args(args: &SimArgs) -> SimConfig {
    let region_effects = if args.region_effects.is_empty() {
        RegionEffects::Random { sd: args.region_sd }
    } else {
        RegionEffects::Fixed(args.region_effects.clone())
    };

    SimConfig {
        start_date: args.start_date,
        years: args.years,
        regions: args.regions,
        baseline_log_rate: args.baseline,
        trend_per_year: args.trend,
        seasonal_sin: args.true_sin,
        seasonal_cos: args.true_cos,
        period_days: args.period,
        region_effects,
        seed: args.seed,
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        model: args.model,
        region_mode: args.region_mode,
        period_days: args.sim.period,
        data_path: args.data.clone(),
        export_summary: args.export_summary.clone(),
        export_data: args.export_data.clone(),
        json: args.json,
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::new(4, format!("Failed to encode JSON: {e}")))
}
