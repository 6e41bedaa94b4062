//! Batch processing command for a directory of PDF files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use pdfctx_core::models::config::OutputConfig;
use pdfctx_core::DocumentReport;

use super::process::default_output_dir;
use super::{build_pipeline, load_config, ExtractArgs};
use crate::output::{report_paths, write_report, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Directory containing PDF files
    #[arg(required = true)]
    input: PathBuf,

    /// Glob pattern for files inside the directory
    #[arg(short, long, default_value = "*.pdf")]
    pattern: String,

    /// Output directory (default: "extracted" next to the input directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write summary.csv to the output directory
    #[arg(long)]
    summary: bool,

    #[command(flatten)]
    extract: ExtractArgs,
}

/// Summary line for one file.
#[derive(Debug, Clone, PartialEq)]
struct BatchEntry {
    filename: String,
    status: Status,
    method: String,
    rows: usize,
    locale: String,
    transactions: Option<usize>,
    error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    /// Engine ran but found no table.
    Empty,
    /// Every extraction mode failed.
    Failed,
    /// Outputs could not be written.
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Empty => "empty",
            Status::Failed => "failed",
            Status::Error => "error",
        }
    }
}

impl BatchEntry {
    fn from_report(filename: String, report: &DocumentReport) -> Self {
        let status = if report.table.is_some() {
            Status::Ok
        } else if report.all_failed() {
            Status::Failed
        } else {
            Status::Empty
        };

        Self {
            filename,
            status,
            method: report.method().map(|m| m.to_string()).unwrap_or_default(),
            rows: report.row_count(),
            locale: report.detection.locale.clone(),
            transactions: report.parsed.as_ref().map(|p| p.transactions().len()),
            error: report.errors().join("; "),
        }
    }
}

/// Files in `dir` matching `pattern`, sorted by path.
fn find_files(dir: &Path, pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let full = dir.join(pattern);
    let full = full
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Non UTF-8 path: {}", full.display()))?;

    let mut files: Vec<PathBuf> = glob(full)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.extract.apply(&mut config);

    if !args.input.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.input.display());
    }

    let files = find_files(&args.input, &args.pattern)?;
    if files.is_empty() {
        println!(
            "{} No files matching '{}' found in {}",
            style("⚠").yellow(),
            args.pattern,
            args.input.display()
        );
        return Ok(());
    }

    let pipeline = build_pipeline(&config, &args.extract)?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input, &config.output));
    std::fs::create_dir_all(&output_dir)?;

    if !args.extract.quiet {
        println!("{} Found {} files to process", style("ℹ").blue(), files.len());
    }

    let pb = if args.extract.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );

    let summary_path = args.summary.then(|| output_dir.join("summary.csv"));
    let mut claimed: HashSet<PathBuf> = summary_path.iter().cloned().collect();

    let mut entries = Vec::with_capacity(files.len());
    for path in &files {
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(filename.clone());

        let report = pipeline.process(path, args.extract.locale.as_deref());
        let mut entry = BatchEntry::from_report(filename, &report);

        match write_outputs(&report, &output_dir, args.extract.format, &config.output, &mut claimed) {
            Ok(written) => debug!("{}: wrote {} files", entry.filename, written.len()),
            Err(e) => {
                warn!("Failed to write outputs for {}: {}", path.display(), e);
                entry.status = Status::Error;
                entry.error = e.to_string();
            }
        }

        match entry.status {
            Status::Failed => warn!("All extraction modes failed for {}", path.display()),
            Status::Empty => warn!("No tables found in {}", path.display()),
            _ => {}
        }

        entries.push(entry);
        pb.inc(1);
    }

    pb.finish_and_clear();

    if let Some(summary_path) = &summary_path {
        write_summary(summary_path, &entries)?;
    }

    if !args.extract.quiet {
        print_summary(&entries, summary_path.as_deref(), start);
    }

    Ok(())
}

/// Write a report's outputs unless one of its paths was already written in
/// this batch (or is reserved for the summary). Nothing is written on a clash.
fn write_outputs(
    report: &DocumentReport,
    dir: &Path,
    format: OutputFormat,
    config: &OutputConfig,
    claimed: &mut HashSet<PathBuf>,
) -> anyhow::Result<Vec<PathBuf>> {
    let paths = report_paths(report, dir, format);
    if let Some(taken) = paths.iter().find(|p| claimed.contains(*p)) {
        anyhow::bail!(
            "{} was already written in this batch; refusing to overwrite it",
            taken.display()
        );
    }

    claimed.extend(paths);
    write_report(report, dir, format, config)
}

fn write_summary(path: &Path, entries: &[BatchEntry]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "method",
        "rows",
        "locale",
        "transactions",
        "error",
    ])?;

    for entry in entries {
        let rows = entry.rows.to_string();
        let transactions = entry.transactions.map(|n| n.to_string()).unwrap_or_default();
        wtr.write_record([
            entry.filename.as_str(),
            entry.status.as_str(),
            entry.method.as_str(),
            rows.as_str(),
            entry.locale.as_str(),
            transactions.as_str(),
            entry.error.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn print_summary(entries: &[BatchEntry], summary_path: Option<&Path>, start: Instant) {
    let count = |status: Status| entries.iter().filter(|e| e.status == status).count();

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        entries.len(),
        start.elapsed()
    );
    println!(
        "   {} with tables, {} empty, {} failed",
        style(count(Status::Ok)).green(),
        style(count(Status::Empty)).yellow(),
        style(count(Status::Failed) + count(Status::Error)).red()
    );

    let flagged: Vec<_> = entries.iter().filter(|e| e.status != Status::Ok).collect();
    if !flagged.is_empty() {
        println!();
        println!("{}", style("Files without tables:").yellow());
        for entry in flagged {
            if entry.error.is_empty() {
                println!("  - {} ({})", entry.filename, entry.status.as_str());
            } else {
                println!("  - {} ({}): {}", entry.filename, entry.status.as_str(), entry.error);
            }
        }
    }

    if let Some(summary_path) = summary_path {
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }
}
