//! Table extraction backend using tabula-java.
//!
//! Runs `java -jar tabula.jar --format JSON` once per mode and decodes the
//! JSON table list it prints on stdout.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, trace};

use super::{Cell, ExtractionMode, PageSelection, RawTable, TableEngine};
use crate::error::EngineError;
use crate::models::config::EngineConfig;

/// tabula-java invoked as a subprocess.
pub struct TabulaEngine {
    java: String,
    jar: PathBuf,
}

#[derive(Debug, Deserialize)]
struct TabulaTable {
    #[serde(default)]
    data: Vec<Vec<TabulaCell>>,
}

#[derive(Debug, Deserialize)]
struct TabulaCell {
    #[serde(default)]
    text: String,
}

impl TabulaEngine {
    pub fn new(java: impl Into<String>, jar: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            jar: jar.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.java_path.clone(), config.tabula_jar.clone())
    }

    pub fn jar(&self) -> &Path {
        &self.jar
    }

    fn mode_flag(mode: ExtractionMode) -> &'static str {
        match mode {
            ExtractionMode::Lattice => "--lattice",
            ExtractionMode::Stream => "--stream",
            ExtractionMode::Guess => "--guess",
        }
    }

    /// Arguments passed to the Java runtime.
    pub fn command_args(&self, path: &Path, pages: &PageSelection, mode: ExtractionMode) -> Vec<String> {
        vec![
            "-Dfile.encoding=UTF8".to_string(),
            "-jar".to_string(),
            self.jar.display().to_string(),
            "--silent".to_string(),
            "--pages".to_string(),
            pages.to_string(),
            "--format".to_string(),
            "JSON".to_string(),
            Self::mode_flag(mode).to_string(),
            path.display().to_string(),
        ]
    }

    fn runtime_error(&self, e: std::io::Error) -> EngineError {
        if e.kind() == std::io::ErrorKind::NotFound {
            EngineError::RuntimeNotFound {
                program: self.java.clone(),
            }
        } else {
            EngineError::Io(e)
        }
    }
}

impl TableEngine for TabulaEngine {
    fn read_tables(
        &self,
        path: &Path,
        pages: &PageSelection,
        mode: ExtractionMode,
    ) -> Result<Vec<RawTable>, EngineError> {
        let args = self.command_args(path, pages, mode);
        trace!("Running {} {}", self.java, args.join(" "));

        let output = Command::new(&self.java)
            .args(&args)
            .output()
            .map_err(|e| self.runtime_error(e))?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(EngineError::Failed { mode, code, stderr });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let tables = parse_tabula_json(&stdout)?;
        debug!("tabula {} returned {} tables", mode, tables.len());
        Ok(tables)
    }

    fn check_available(&self) -> Result<(), EngineError> {
        if !self.jar.is_file() {
            return Err(EngineError::JarMissing(self.jar.clone()));
        }

        let output = Command::new(&self.java)
            .arg("-version")
            .output()
            .map_err(|e| self.runtime_error(e))?;

        if !output.status.success() {
            return Err(EngineError::RuntimeNotFound {
                program: self.java.clone(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "tabula"
    }
}

/// Decode tabula's JSON output into raw tables.
///
/// Empty cell text becomes [`Cell::Empty`]; line breaks inside a cell become spaces.
pub fn parse_tabula_json(json: &str) -> Result<Vec<RawTable>, EngineError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tables: Vec<TabulaTable> =
        serde_json::from_str(json).map_err(|e| EngineError::InvalidOutput(e.to_string()))?;

    Ok(tables
        .into_iter()
        .map(|table| {
            let rows = table
                .data
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|cell| Cell::from(cell.text.replace(['\r', '\n'], " ").trim()))
                        .collect()
                })
                .collect();
            RawTable::new(rows)
        })
        .collect())
}
