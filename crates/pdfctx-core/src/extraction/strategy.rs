//! Multi-strategy extraction: try every layout mode, keep the richest table.

use std::path::Path;

use tracing::{debug, info, warn};

use super::{ExtractionMode, ExtractionResult, PageSelection, TableEngine};

/// What one mode produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptResult {
    /// Tables were returned, with this many rows in total.
    Rows(usize),
    /// The engine returned no tables.
    Empty,
    /// The engine raised an error; the attempt was discarded.
    Failed(String),
}

/// Log entry for a single mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeAttempt {
    pub mode: ExtractionMode,
    pub result: AttemptResult,
}

/// Outcome of running every mode on one document.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    /// Richest result, if any mode produced rows.
    pub best: Option<ExtractionResult>,
    /// One entry per mode, in the order tried.
    pub attempts: Vec<ModeAttempt>,
}

impl StrategyOutcome {
    /// Mode of the selected result.
    pub fn method(&self) -> Option<ExtractionMode> {
        self.best.as_ref().map(|r| r.method)
    }

    /// True when every mode raised an error.
    pub fn all_failed(&self) -> bool {
        self.attempts
            .iter()
            .all(|a| matches!(a.result, AttemptResult::Failed(_)))
    }

    pub fn into_parts(self) -> (Option<ExtractionResult>, Option<ExtractionMode>) {
        let method = self.method();
        (self.best, method)
    }
}

/// Runs an engine under `lattice`, `stream` and `guess` and selects the result with the most rows.
pub struct StrategyExtractor<E> {
    engine: E,
    pages: PageSelection,
}

impl<E: TableEngine> StrategyExtractor<E> {
    /// Create an extractor requesting all pages.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            pages: PageSelection::All,
        }
    }

    /// Restrict the pages requested from the engine.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Extract tables from `path`.
    ///
    /// A failing mode never aborts the run. Ties keep the mode tried first.
    pub fn extract(&self, path: &Path) -> StrategyOutcome {
        info!("Extracting tables from {}", path.display());

        let mut best: Option<ExtractionResult> = None;
        let mut attempts = Vec::with_capacity(ExtractionMode::ALL.len());

        for mode in ExtractionMode::ALL {
            let result = match self.engine.read_tables(path, &self.pages, mode) {
                Ok(tables) if tables.is_empty() => {
                    debug!("{}: no tables", mode);
                    AttemptResult::Empty
                }
                Ok(tables) => {
                    let combined = ExtractionResult::from_tables(mode, tables);
                    let rows = combined.row_count();
                    debug!("{}: {} rows", mode, rows);

                    let current = best.as_ref().map(ExtractionResult::row_count).unwrap_or(0);
                    if rows > current {
                        best = Some(combined);
                    }
                    AttemptResult::Rows(rows)
                }
                Err(e) => {
                    warn!("{} extraction failed for {}: {}", mode, path.display(), e);
                    AttemptResult::Failed(e.to_string())
                }
            };

            attempts.push(ModeAttempt { mode, result });
        }

        match &best {
            Some(result) => info!(
                "Selected {} ({} rows) for {}",
                result.method,
                result.row_count(),
                path.display()
            ),
            None => info!("No tables extracted from {}", path.display()),
        }

        StrategyOutcome { best, attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::testing::ScriptedEngine;
    use crate::extraction::Cell;
    use pretty_assertions::assert_eq;

    fn run(engine: ScriptedEngine) -> StrategyOutcome {
        StrategyExtractor::new(engine).extract(Path::new("statement.pdf"))
    }

    #[test]
    fn test_selects_strict_maximum() {
        let outcome = run(ScriptedEngine::new()
            .tables(ExtractionMode::Lattice, &[3])
            .tables(ExtractionMode::Stream, &[7])
            .tables(ExtractionMode::Guess, &[5]));

        assert_eq!(outcome.method(), Some(ExtractionMode::Stream));
        assert_eq!(outcome.best.unwrap().row_count(), 7);
    }

    #[test]
    fn test_tie_prefers_earlier_mode() {
        let outcome = run(ScriptedEngine::new()
            .tables(ExtractionMode::Lattice, &[2])
            .tables(ExtractionMode::Stream, &[4])
            .tables(ExtractionMode::Guess, &[4]));
        assert_eq!(outcome.method(), Some(ExtractionMode::Stream));

        let outcome = run(ScriptedEngine::new()
            .tables(ExtractionMode::Lattice, &[4])
            .tables(ExtractionMode::Stream, &[4])
            .tables(ExtractionMode::Guess, &[4]));
        assert_eq!(outcome.method(), Some(ExtractionMode::Lattice));
    }

    #[test]
    fn test_concatenates_tables_of_one_mode() {
        let outcome = run(ScriptedEngine::new()
            .tables(ExtractionMode::Lattice, &[2, 3])
            .tables(ExtractionMode::Stream, &[4]));

        let best = outcome.best.unwrap();
        assert_eq!(best.method, ExtractionMode::Lattice);
        assert_eq!(best.row_count(), 5);
        assert_eq!(best.rows[0][0], Cell::from("lattice-0-0"));
        assert_eq!(best.rows[2][0], Cell::from("lattice-1-0"));
    }

    #[test]
    fn test_failing_mode_does_not_abort() {
        let outcome = run(ScriptedEngine::new()
            .failing(ExtractionMode::Lattice)
            .tables(ExtractionMode::Stream, &[1])
            .failing(ExtractionMode::Guess));

        assert_eq!(outcome.method(), Some(ExtractionMode::Stream));
        assert!(matches!(outcome.attempts[0].result, AttemptResult::Failed(_)));
        assert_eq!(outcome.attempts[1].result, AttemptResult::Rows(1));
        assert!(!outcome.all_failed());
    }

    #[test]
    fn test_all_failed_is_empty_outcome() {
        let outcome = run(ScriptedEngine::new()
            .failing(ExtractionMode::Lattice)
            .failing(ExtractionMode::Stream)
            .failing(ExtractionMode::Guess));

        assert!(outcome.all_failed());
        assert_eq!(outcome.into_parts(), (None, None));
    }

    #[test]
    fn test_zero_rows_never_selected() {
        let outcome = run(ScriptedEngine::new()
            .tables(ExtractionMode::Lattice, &[0])
            .tables(ExtractionMode::Guess, &[0, 0]));

        assert_eq!(outcome.best, None);
        assert_eq!(outcome.attempts[0].result, AttemptResult::Rows(0));
        assert_eq!(outcome.attempts[1].result, AttemptResult::Empty);
        assert!(!outcome.all_failed());
    }
}
