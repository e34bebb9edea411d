use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;

use aetrs::config::AnalysisConfig;
use aetrs::import::{parse_elapsed, CsvImporter};
use aetrs::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use aetrs::{report, DriftAnalyzer};

/// aetrs - Aerobic Threshold Drift Analysis
///
/// Runs the sliding-window HR decoupling test over a workout timeseries:
/// each window is split in half and an effort-normalized heart-rate ratio
/// is compared between the halves. Low drift means the effort stayed
/// below the aerobic threshold.
#[derive(Parser)]
#[command(name = "aetrs")]
#[command(version = "0.1.0")]
#[command(about = "Aerobic threshold drift analysis", long_about = None)]
struct Cli {
    /// Path to the workout CSV (timestamp, heart_rate, speed, elevation)
    csv_path: PathBuf,

    /// Elapsed time to start the analysis at (H:M:S, H:M, or seconds)
    #[arg(short, long, value_parser = elapsed_arg)]
    start: f64,

    /// Elapsed time to stop the analysis at
    #[arg(short, long, value_parser = elapsed_arg)]
    end: f64,

    /// Seconds to slide the window between evaluations
    #[arg(short = 'f', long, default_value_t = 1.0)]
    step: f64,

    /// Minutes in each half of the decoupling test
    #[arg(short = 'w', long, default_value_t = 30.0)]
    half_width: f64,

    /// Maximum drift percentage for a passing verdict
    #[arg(long, default_value_t = 5.0)]
    threshold: f64,

    /// Drop samples above this rolling-mean speed (mph)
    #[arg(long)]
    max_speed: Option<f64>,

    /// Drop samples above this rolling-mean climb rate (ft/hour)
    #[arg(long)]
    max_climb: Option<f64>,

    /// Warn about data gaps longer than this many seconds
    #[arg(long, default_value_t = 5.0)]
    gap_warn: f64,

    /// Emit the aggregate results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,
}

fn elapsed_arg(value: &str) -> Result<f64, String> {
    parse_elapsed(value)
        .ok_or_else(|| format!("'{}' is not H:M:S, H:M, or a number of seconds", value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        format: cli.log_format,
    })?;

    let config = AnalysisConfig {
        step_seconds: cli.step,
        half_width_seconds: cli.half_width * 60.0,
        success_threshold_pct: cli.threshold,
        max_speed: cli.max_speed,
        max_climb_rate: cli.max_climb,
    };

    let series = CsvImporter::new()
        .with_gap_threshold(cli.gap_warn)
        .import(&cli.csv_path)
        .with_context(|| format!("failed to load {}", cli.csv_path.display()))?
        .without_outliers(config.max_speed, config.max_climb_rate)?;

    let analyzer = DriftAnalyzer::new(config)?;
    let analysis = analyzer
        .analyze(&series, cli.start, cli.end)
        .context("analysis failed")?;

    if analysis.results.is_empty() {
        anyhow::bail!("no method produced a valid window; check the input for gaps");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("{}", report::render(&analysis));
    match analysis.results.iter().find(|r| r.successful) {
        Some(best) => println!(
            "{} effort stayed aerobic by the {} method",
            "PASS".green().bold(),
            best.method
        ),
        None => println!(
            "{} drift exceeded {:.1}% for every method",
            "FAIL".red().bold(),
            cli.threshold
        ),
    }
    Ok(())
}
