//! Error types for the pdfctx-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::extraction::ExtractionMode;

/// Main error type for the pdfctx library.
#[derive(Error, Debug)]
pub enum PdfCtxError {
    /// Table-extraction engine error.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Locale lookup or detector configuration error.
    #[error("locale error: {0}")]
    Locale(#[from] LocaleError),

    /// Unknown domain parser requested.
    #[error("unknown parser '{name}'. Available: {available}")]
    UnknownParser { name: String, available: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised at the external table-extraction engine boundary.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The runtime used to launch the engine could not be started.
    #[error("'{program}' not found. tabula-java requires a Java runtime (java on PATH or engine.java_path)")]
    RuntimeNotFound { program: String },

    /// The engine archive does not exist.
    #[error("tabula jar not found at {0}")]
    JarMissing(PathBuf),

    /// The engine ran but exited unsuccessfully.
    #[error("{mode} extraction failed with exit code {code}: {stderr}")]
    Failed {
        mode: ExtractionMode,
        code: i32,
        stderr: String,
    },

    /// The engine output could not be decoded.
    #[error("invalid engine output: {0}")]
    InvalidOutput(String),

    /// I/O error while talking to the engine.
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to locale configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// Locale code is not present in the registry.
    #[error("unknown locale: {code}. Available: {available}")]
    Unknown { code: String, available: String },

    /// Decimal and thousands separators must differ.
    #[error("locale {code} uses '{separator}' as both decimal and thousands separator")]
    AmbiguousSeparators { code: String, separator: char },

    /// Two configs share the same code.
    #[error("locale {0} is registered twice")]
    Duplicate(String),
}

/// Result type for the pdfctx library.
pub type Result<T> = std::result::Result<T, PdfCtxError>;
