//! Ocean Pipeline CLI Module
//!
//! Command-line interface for running the survey pipeline and inspecting input files.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

use crate::pipeline::{FitScope, Pipeline, PipelineConfig, PipelineReport};
use crate::preprocessing::FeatureStats;
use crate::survey::{self, COUNTRY_COLUMN};
use crate::utils::DataLoader;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn warn(s: &str) -> ColoredString   { s.truecolor(230, 190, 90) }

fn kv(key: &str, val: &str) {
    println!("  {:<16} {}", muted(key), val.white());
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ocean")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Predict a Big Five survey answer from country and the other answers")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and print the test accuracy
    Run {
        /// Survey export (tab-separated unless the config says otherwise)
        #[arg(short, long)]
        data: PathBuf,

        /// JSON pipeline configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for the train/test split
        #[arg(short, long)]
        seed: Option<u64>,

        /// Item column to predict
        #[arg(short, long)]
        target: Option<String>,

        /// Rows the preprocessing is fitted on (global, train)
        #[arg(long)]
        fit_scope: Option<String>,

        /// Write the run report as JSON
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Show schema and per-item statistics of a survey export
    Info {
        /// Survey export
        #[arg(short, long)]
        data: PathBuf,

        /// Field delimiter
        #[arg(long, default_value = "\t")]
        delimiter: char,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_run(
    data_path: &Path,
    config_path: Option<&Path>,
    seed: Option<u64>,
    target: Option<String>,
    fit_scope: Option<&str>,
    report_path: Option<&Path>,
) -> anyhow::Result<()> {
    section("Run");

    let mut config = match config_path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if seed.is_some() {
        config = config.with_seed(seed);
    }
    if let Some(target) = target {
        config = config.with_target(target);
    }
    if let Some(scope) = fit_scope {
        config = config.with_fit_scope(scope.parse::<FitScope>()?);
    }
    let pipeline = Pipeline::new(config)?;

    step_run("Loading data");
    let df = pipeline.loader()?.load(data_path)?;
    step_done(&format!("{} rows × {} cols", df.height(), df.width()));

    step_run("Running pipeline");
    let report = pipeline.run_frame(&df)?;
    step_done(&format!("{:.2}s", report.elapsed_secs));

    print_summary(&report);

    if let Some(path) = report_path {
        report.write_json(path)?;
        step_ok(&format!("Report written to {}", path.display()));
    }

    println!();
    println!("{}", report.accuracy_line());
    Ok(())
}

fn print_summary(report: &PipelineReport) {
    section("Summary");
    kv("Target", &report.target_column);
    kv("Fit scope", &format!("{:?}", report.fit_scope));
    kv(
        "Split",
        &format!("{} train / {} test of {}", report.train_rows, report.test_rows, report.total_rows),
    );
    kv("Seed", &report.seed.map_or_else(|| "none".to_string(), |s| s.to_string()));
    kv("Categories", &report.categories.len().to_string());
    kv("Features", &report.n_features().to_string());

    let skewed = if report.skewed_columns.is_empty() {
        "none".to_string()
    } else {
        report.skewed_columns.join(", ")
    };
    kv("Log-transformed", &skewed);

    let classes: Vec<String> = report.classes.iter().map(|c| c.to_string()).collect();
    kv("Classes", &classes.join(" "));

    let convergence = if report.converged {
        ok("converged")
    } else {
        warn("iteration cap reached")
    };
    println!("  {:<16} {} {}", muted("Iterations"), report.iterations.to_string().white(), convergence);
}

pub fn cmd_info(data_path: &Path, delimiter: char) -> anyhow::Result<()> {
    section("Data Info");

    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(|b| b.is_ascii())
        .ok_or_else(|| anyhow::anyhow!("delimiter {:?} is not a single ASCII character", delimiter))?;
    let loader = DataLoader::new().with_delimiter(delimiter);

    let info = loader.file_info(data_path)?;
    kv("File", &info.path);
    kv("Size", &format!("{:.2} MB", info.file_size as f64 / 1024.0 / 1024.0));
    kv("Rows", &info.n_rows.to_string());
    kv("Columns", &info.columns.len().to_string());

    let df = loader.load(data_path)?;
    let items = survey::item_columns();
    if let Err(e) = survey::validate_columns(&df, COUNTRY_COLUMN, &items) {
        println!();
        println!("  {} {}", warn("!"), e);
    }

    println!();
    println!(
        "  {:<12} {:<10} {:>6} {:>8} {:>8} {:>8}",
        muted("Column"),
        muted("Type"),
        muted("Nulls"),
        muted("Mean"),
        muted("Min"),
        muted("Max")
    );
    println!("  {}", dim(&"─".repeat(58)));

    if let Ok(country) = df.column(COUNTRY_COLUMN) {
        println!(
            "  {:<12} {:<10} {:>6} {:>8}",
            COUNTRY_COLUMN,
            format!("{:?}", country.dtype()).truecolor(140, 140, 140),
            country.null_count(),
            format!("{} uniq", country.n_unique().unwrap_or(0))
        );
    }

    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v));
    for name in &items {
        let Ok(column) = df.column(name) else { continue };
        let stats = FeatureStats::from_column(column)?;
        println!(
            "  {:<12} {:<10} {:>6} {:>8} {:>8} {:>8}",
            stats.name,
            format!("{:?}", column.dtype()).truecolor(140, 140, 140),
            stats.null_count,
            fmt(stats.mean),
            fmt(stats.min),
            fmt(stats.max)
        );
    }

    println!();
    Ok(())
}
