//! Process command - extract tables from a single PDF file.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use pdfctx_core::models::config::OutputConfig;
use pdfctx_core::{DocumentReport, ParseOutcome};

use super::{build_pipeline, load_config, ExtractArgs};
use crate::output::write_report;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory (default: <input dir>/extracted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    extract: ExtractArgs,
}

/// Default output directory, next to the input.
pub fn default_output_dir(input: &Path, config: &OutputConfig) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&config.directory_name)
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.extract.apply(&mut config);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if args.input.is_dir() {
        anyhow::bail!(
            "{} is a directory. Use 'pdfctx batch' to process a directory.",
            args.input.display()
        );
    }

    let pipeline = build_pipeline(&config, &args.extract)?;

    info!("Processing file: {}", args.input.display());

    let pb = if args.extract.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting tables from {}...", args.input.display()));

    let report = pipeline.process(&args.input, args.extract.locale.as_deref());

    pb.finish_and_clear();

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input, &config.output));
    let written = write_report(&report, &output_dir, args.extract.format, &config.output)?;

    if !args.extract.quiet {
        print_report(&report, &written);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if report.all_failed() {
        anyhow::bail!("Every extraction mode failed:\n  {}", report.errors().join("\n  "));
    }

    Ok(())
}

fn print_report(report: &DocumentReport, written: &[PathBuf]) {
    match (&report.table, report.method()) {
        (Some(table), Some(method)) => println!(
            "{} {}: {} rows ({} mode)",
            style("✓").green(),
            report.source,
            table.row_count(),
            method
        ),
        _ => println!(
            "{} {}: no tables found",
            style("⚠").yellow(),
            report.source
        ),
    }

    println!("{} Locale: {}", style("ℹ").blue(), report.detection);

    match &report.parsed {
        Some(ParseOutcome::Transactions(transactions)) => println!(
            "{} {} transactions",
            style("ℹ").blue(),
            transactions.len()
        ),
        Some(ParseOutcome::NoTransactions { rows_scanned }) => println!(
            "{} No transactions found in {} rows",
            style("⚠").yellow(),
            rows_scanned
        ),
        None => {}
    }

    for path in written {
        println!("{} Output written to {}", style("✓").green(), path.display());
    }
}
