//! Test doubles for the engine seam.

use std::collections::HashMap;
use std::path::Path;

use super::{Cell, ExtractionMode, PageSelection, RawTable, TableEngine};
use crate::error::EngineError;

/// Engine with a canned response per mode. Unscripted modes return no tables.
pub(crate) struct ScriptedEngine {
    responses: HashMap<ExtractionMode, Result<Vec<RawTable>, String>>,
}

impl ScriptedEngine {
    pub(crate) fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    /// Respond to `mode` with one generated table per entry, each with that many rows.
    pub(crate) fn tables(self, mode: ExtractionMode, row_counts: &[usize]) -> Self {
        let tables = row_counts
            .iter()
            .enumerate()
            .map(|(t, &n)| {
                RawTable::new(
                    (0..n)
                        .map(|r| vec![Cell::Text(format!("{}-{}-{}", mode, t, r))])
                        .collect(),
                )
            })
            .collect();
        self.raw(mode, tables)
    }

    /// Respond to `mode` with the given tables.
    pub(crate) fn raw(mut self, mode: ExtractionMode, tables: Vec<RawTable>) -> Self {
        self.responses.insert(mode, Ok(tables));
        self
    }

    pub(crate) fn failing(mut self, mode: ExtractionMode) -> Self {
        self.responses.insert(mode, Err(format!("{} blew up", mode)));
        self
    }
}

impl TableEngine for ScriptedEngine {
    fn read_tables(
        &self,
        _path: &Path,
        _pages: &PageSelection,
        mode: ExtractionMode,
    ) -> Result<Vec<RawTable>, EngineError> {
        match self.responses.get(&mode) {
            None => Ok(Vec::new()),
            Some(Err(msg)) => Err(EngineError::InvalidOutput(msg.clone())),
            Some(Ok(tables)) => Ok(tables.clone()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
