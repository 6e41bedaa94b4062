//! Table extraction through an external engine.
//!
//! The engine itself is a collaborator behind the [`TableEngine`] trait;
//! [`StrategyExtractor`] runs it under several layout heuristics and keeps
//! the richest result.

mod strategy;
mod tabula;
#[cfg(test)]
pub(crate) mod testing;

pub use strategy::{AttemptResult, ModeAttempt, StrategyExtractor, StrategyOutcome};
pub use tabula::{parse_tabula_json, TabulaEngine};

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use crate::error::EngineError;

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value.
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Text content of the cell, or `None` when the cell carries no value.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(n) if n.is_nan() => None,
            Cell::Number(_) => Some(Cow::Owned(self.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().is_none()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            // Whole numbers keep one decimal place ("2300.0") like the engine's float output.
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e16 => write!(f, "{:.1}", n),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// An ordered sequence of cells.
pub type Row = Vec<Cell>;

/// One table as returned by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Row>,
}

impl RawTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

/// Layout heuristic passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionMode {
    /// Ruled table borders delimit cells.
    Lattice,
    /// Whitespace-aligned columns, no borders.
    Stream,
    /// Let the engine pick a layout.
    Guess,
}

impl ExtractionMode {
    /// All modes, in the order they are tried.
    pub const ALL: [ExtractionMode; 3] = [
        ExtractionMode::Lattice,
        ExtractionMode::Stream,
        ExtractionMode::Guess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Lattice => "lattice",
            ExtractionMode::Stream => "stream",
            ExtractionMode::Guess => "guess",
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pages requested from the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    #[default]
    All,
    /// 1-indexed page numbers.
    Pages(Vec<u32>),
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSelection::All => f.write_str("all"),
            PageSelection::Pages(pages) => {
                let list: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
                f.write_str(&list.join(","))
            }
        }
    }
}

/// External table-extraction engine.
pub trait TableEngine {
    /// Extract every table found on the selected pages using `mode`.
    fn read_tables(
        &self,
        path: &Path,
        pages: &PageSelection,
        mode: ExtractionMode,
    ) -> Result<Vec<RawTable>, EngineError>;

    /// Verify that the engine and its runtime can be launched.
    fn check_available(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Name of this engine (for diagnostics).
    fn name(&self) -> &str;
}

/// Table produced by one extraction attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Mode that produced the rows.
    pub method: ExtractionMode,
    pub rows: Vec<Row>,
}

impl ExtractionResult {
    /// Concatenate tables in order. Columns are not reconciled across tables.
    pub fn from_tables(method: ExtractionMode, tables: Vec<RawTable>) -> Self {
        let rows = tables.into_iter().flat_map(|t| t.rows).collect();
        Self { method, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row, in cells.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Non-empty cell values, row by row.
    pub fn values(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.rows.iter().flatten().filter_map(Cell::as_text)
    }
}

/// Join the non-empty cells of a row with single spaces.
pub fn join_row(row: &[Cell]) -> String {
    let parts: Vec<Cow<'_, str>> = row.iter().filter_map(Cell::as_text).collect();
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::from("").as_text(), None);
        assert_eq!(Cell::Text("   ".to_string()).as_text(), None);
        assert_eq!(Cell::from("Solde").as_text().as_deref(), Some("Solde"));
        assert_eq!(Cell::Number(2300.0).as_text().as_deref(), Some("2300.0"));
        assert_eq!(Cell::Number(45.5).as_text().as_deref(), Some("45.5"));
        assert_eq!(Cell::Number(f64::NAN).as_text(), None);
    }

    #[test]
    fn test_concatenation_preserves_order() {
        let first = RawTable::new(vec![vec!["a".into(), "b".into()], vec!["c".into()]]);
        let second = RawTable::new(vec![vec!["d".into(), "e".into(), "f".into()]]);

        let result = ExtractionResult::from_tables(ExtractionMode::Stream, vec![first, second]);

        assert_eq!(result.row_count(), 3);
        assert_eq!(result.width(), 3);
        assert_eq!(result.rows[2][0], Cell::from("d"));
        assert_eq!(result.values().collect::<Vec<_>>(), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_join_row_skips_empty() {
        let row = vec![
            Cell::from("15/01/2024"),
            Cell::Empty,
            Cell::from("Loyer"),
            Cell::Text(" ".to_string()),
            Cell::from("-650,00"),
        ];
        assert_eq!(join_row(&row), "15/01/2024 Loyer -650,00");
    }

    #[test]
    fn test_page_selection_display() {
        assert_eq!(PageSelection::All.to_string(), "all");
        assert_eq!(PageSelection::Pages(vec![1, 3]).to_string(), "1,3");
    }
}
