//! Command-line parsing for the seasonal harmonic regression tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_PERIOD_DAYS, ModelKind, RegionMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "season",
    version,
    about = "Seasonal peak/trough recovery from harmonic regression coefficients"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a sin/cos coefficient pair into amplitude, peak day and trough day.
    Recover(RecoverArgs),
    /// Simulate daily counts with known seasonal structure and write them to CSV.
    Simulate(SimulateArgs),
    /// Fit a harmonic regression (simulated or CSV data) and report the seasonal summary.
    Fit(FitArgs),
    /// Re-print a summary JSON written by `season fit --export-summary`.
    Show(ShowArgs),
}

/// Options for `season recover`.
#[derive(Debug, Args, Clone)]
pub struct RecoverArgs {
    /// Coefficient of the sine term.
    #[arg(long, allow_negative_numbers = true)]
    pub sin: f64,

    /// Coefficient of the cosine term.
    #[arg(long, allow_negative_numbers = true)]
    pub cos: f64,

    /// Cycle length in days.
    #[arg(long, env = "SEASON_PERIOD_DAYS", default_value_t = DEFAULT_PERIOD_DAYS)]
    pub period: f64,

    /// Wrap peak/trough days into a single cycle for display.
    #[arg(long)]
    pub wrap: bool,

    /// Show calendar dates for this year (implies --wrap).
    #[arg(long)]
    pub year: Option<i32>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Synthetic dataset settings shared by `simulate` and `fit`.
#[derive(Debug, Args, Clone)]
pub struct SimArgs {
    /// First simulated day.
    #[arg(long, default_value = "2019-01-01")]
    pub start_date: NaiveDate,

    /// Number of simulated years.
    #[arg(long, default_value_t = 3)]
    pub years: u32,

    /// Number of regions.
    #[arg(long, default_value_t = 3)]
    pub regions: usize,

    /// Baseline log daily rate.
    #[arg(long, allow_negative_numbers = true, default_value_t = 3.0)]
    pub baseline: f64,

    /// Log-rate change per year.
    #[arg(long, allow_negative_numbers = true, default_value_t = 0.05)]
    pub trend: f64,

    /// True sine coefficient.
    #[arg(long = "true-sin", allow_negative_numbers = true, default_value_t = 0.4)]
    pub true_sin: f64,

    /// True cosine coefficient.
    #[arg(long = "true-cos", allow_negative_numbers = true, default_value_t = -0.3)]
    pub true_cos: f64,

    /// Cycle length in days (used by the simulator and the fitted harmonic terms).
    #[arg(long, env = "SEASON_PERIOD_DAYS", default_value_t = DEFAULT_PERIOD_DAYS)]
    pub period: f64,

    /// Standard deviation of random region offsets (log scale).
    #[arg(long, default_value_t = 0.3)]
    pub region_sd: f64,

    /// Explicit region offsets (comma-separated, one per region); overrides --region-sd.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub region_effects: Vec<f64>,

    /// Random seed.
    #[arg(long, env = "SEASON_SEED", default_value_t = 42)]
    pub seed: u64,
}

/// Options for `season simulate`.
#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub sim: SimArgs,

    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,
}

/// Options for `season fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub sim: SimArgs,

    /// Fit this CSV (`date,region,count` [+ `day_of_year`, `year_index`]) instead of simulating.
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Response scale of the regression.
    #[arg(long, value_enum, default_value_t = ModelKind::LogLinear)]
    pub model: ModelKind,

    /// How regions enter the regression.
    #[arg(long, value_enum, default_value_t = RegionMode::Fixed)]
    pub region_mode: RegionMode,

    /// Export fits + seasonal summaries to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_summary: Option<PathBuf>,

    /// Export the fitted observations to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_data: Option<PathBuf>,

    /// Print the summary JSON to stdout instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Options for `season show`.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Summary JSON file produced by `season fit --export-summary`.
    #[arg(long, value_name = "JSON")]
    pub summary: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recover_accepts_negative_coefficients() {
        let cli = Cli::parse_from(["season", "recover", "--sin", "-0.3", "--cos", "0.1", "--wrap"]);
        let Command::Recover(args) = cli.command else {
            panic!("expected recover");
        };
        assert_eq!(args.sin, -0.3);
        assert_eq!(args.cos, 0.1);
        assert!(args.wrap);
        assert!(!args.json);
    }

    #[test]
    fn fit_defaults_and_region_effects() {
        let cli = Cli::parse_from([
            "season",
            "-vv",
            "fit",
            "--region-mode",
            "per-region",
            "--regions",
            "2",
            "--region-effects",
            "0.1,-0.2",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.model, ModelKind::LogLinear);
        assert_eq!(args.region_mode, RegionMode::PerRegion);
        assert_eq!(args.sim.region_effects, vec![0.1, -0.2]);
        assert_eq!(args.sim.start_date, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert!(args.data.is_none());
    }
}
