//! CSV and Markdown output for extracted tables and transactions.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use pdfctx_core::models::config::OutputConfig;
use pdfctx_core::{DocumentReport, ExtractionResult, Transaction};

/// Output format for extracted tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV file
    Csv,
    /// Markdown file with a GFM table
    Md,
    /// Both CSV and Markdown
    Both,
}

impl OutputFormat {
    pub fn wants_csv(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Both)
    }

    pub fn wants_markdown(self) -> bool {
        matches!(self, OutputFormat::Md | OutputFormat::Both)
    }
}

/// A table flattened to strings, with a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Flatten an extraction result, padding short rows to the widest one.
    ///
    /// With `header_from_first_row` the first row names the columns (blank
    /// names become `Column N`); otherwise every column is `Column N`.
    pub fn from_result(table: &ExtractionResult, header_from_first_row: bool) -> Self {
        let width = table.width();
        let mut rows = table.rows.iter().map(|row| {
            let mut cells: Vec<String> = row
                .iter()
                .map(|c| c.as_text().map(|t| t.trim().to_string()).unwrap_or_default())
                .collect();
            cells.resize(width, String::new());
            cells
        });

        let first = if header_from_first_row { rows.next() } else { None };
        let headers = match first {
            Some(first) => first
                .into_iter()
                .enumerate()
                .map(|(i, name)| if name.is_empty() { format!("Column {}", i + 1) } else { name })
                .collect(),
            None => (1..=width).map(|i| format!("Column {}", i)).collect(),
        };

        Self {
            headers,
            rows: rows.collect(),
        }
    }
}

pub fn write_csv(path: &Path, view: &TableView) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&view.headers)?;
    for row in &view.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn escape_markdown(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Render a GFM pipe table.
pub fn markdown_table(view: &TableView) -> String {
    let mut markdown = String::new();

    markdown.push('|');
    for header in &view.headers {
        markdown.push(' ');
        markdown.push_str(&escape_markdown(header));
        markdown.push_str(" |");
    }
    markdown.push('\n');

    markdown.push('|');
    for _ in &view.headers {
        markdown.push_str("------|");
    }
    markdown.push('\n');

    for row in &view.rows {
        markdown.push('|');
        for value in row {
            markdown.push(' ');
            markdown.push_str(&escape_markdown(value));
            markdown.push_str(" |");
        }
        markdown.push('\n');
    }

    markdown
}

/// Full Markdown document for one source file.
pub fn markdown_document(view: &TableView, source: &str, timestamp: &str) -> String {
    format!(
        "# Extracted from {}\n\n{}\n---\n*Extracted: {}*\n",
        source,
        markdown_table(view),
        timestamp
    )
}

/// One record per transaction; the header comes from the serialized field names.
pub fn write_transactions_csv(path: &Path, transactions: &[Transaction]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for tx in transactions {
        wtr.serialize(tx)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Files [`write_report`] creates for a report, in write order.
pub fn report_paths(report: &DocumentReport, dir: &Path, format: OutputFormat) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if report.table.is_none() {
        return paths;
    }
    if format.wants_csv() {
        paths.push(dir.join(format!("{}.csv", report.source)));
    }
    if format.wants_markdown() {
        paths.push(dir.join(format!("{}.md", report.source)));
    }
    if report.parsed.as_ref().is_some_and(|p| !p.is_empty()) {
        paths.push(dir.join(format!("{}_transactions.csv", report.source)));
    }
    paths
}

/// Write every output for a report into `dir`, returning the files written.
pub fn write_report(
    report: &DocumentReport,
    dir: &Path,
    format: OutputFormat,
    config: &OutputConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let Some(table) = &report.table else {
        return Ok(written);
    };

    fs::create_dir_all(dir)?;
    let view = TableView::from_result(table, config.header_from_first_row);

    if format.wants_csv() {
        let path = dir.join(format!("{}.csv", report.source));
        write_csv(&path, &view)?;
        written.push(path);
    }

    if format.wants_markdown() {
        let path = dir.join(format!("{}.md", report.source));
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        fs::write(&path, markdown_document(&view, &report.source, &timestamp))?;
        written.push(path);
    }

    if let Some(parsed) = &report.parsed {
        if !parsed.is_empty() {
            let path = dir.join(format!("{}_transactions.csv", report.source));
            write_transactions_csv(&path, parsed.transactions())?;
            written.push(path);
        }
    }

    for path in &written {
        debug!("Wrote {}", path.display());
    }
    Ok(written)
}
