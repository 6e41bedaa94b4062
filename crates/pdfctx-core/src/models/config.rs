//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::locale::DEFAULT_CONFIDENCE_THRESHOLD;

/// Main configuration for the pdfctx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfCtxConfig {
    /// External engine configuration.
    pub engine: EngineConfig,

    /// Locale detection configuration.
    pub locale: LocaleSettings,

    /// Extraction and parsing configuration.
    pub extraction: ExtractionConfig,

    /// Output file configuration.
    pub output: OutputConfig,
}

/// tabula-java engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Java executable used to launch tabula.
    pub java_path: String,

    /// Path to the tabula-java jar with dependencies.
    pub tabula_jar: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            java_path: "java".to_string(),
            tabula_jar: PathBuf::from("tabula.jar"),
        }
    }
}

/// Locale detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleSettings {
    /// Locale used when nothing else matches.
    pub default_locale: String,

    /// Minimum keyword ratio for content-based detection (0.0 - 1.0).
    pub confidence_threshold: f64,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            default_locale: "fr".to_string(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Extraction and parsing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Convert cells holding a locale-formatted amount into numbers.
    pub normalize_amounts: bool,

    /// Domain parser applied after extraction (e.g. "bank_statement").
    pub parser: Option<String>,
}

/// Output file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use the first extracted row as column headers.
    pub header_from_first_row: bool,

    /// Default directory name for outputs, created next to the input.
    pub directory_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            header_from_first_row: true,
            directory_name: "extracted".to_string(),
        }
    }
}

impl PdfCtxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = PdfCtxConfig::default();
        assert_eq!(config.locale.default_locale, "fr");
        assert_eq!(config.locale.confidence_threshold, 0.3);
        assert_eq!(config.engine.java_path, "java");
        assert!(config.output.header_from_first_row);
        assert!(!config.extraction.normalize_amounts);
        assert_eq!(config.extraction.parser, None);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"locale": {"default_locale": "de"}}"#).unwrap();

        let config = PdfCtxConfig::from_file(&path).unwrap();
        assert_eq!(config.locale.default_locale, "de");
        assert_eq!(config.locale.confidence_threshold, 0.3);
        assert_eq!(config.output.directory_name, "extracted");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PdfCtxConfig::default();
        config.extraction.parser = Some("bank_statement".to_string());
        config.save(&path).unwrap();

        let loaded = PdfCtxConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.parser.as_deref(), Some("bank_statement"));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = PdfCtxConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
