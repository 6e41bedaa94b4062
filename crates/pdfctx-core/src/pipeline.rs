//! Per-document processing: extract, detect locale, normalize, parse.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::extraction::{
    AttemptResult, ExtractionMode, ExtractionResult, ModeAttempt, PageSelection, StrategyExtractor, TableEngine,
};
use crate::locale::{DetectionOutcome, LocaleDetector, LocaleRegistry};
use crate::models::config::PdfCtxConfig;
use crate::normalize::TableNormalizer;
use crate::parsers::{parser_by_name, DocumentParser, ParseOutcome};

/// Everything learned about one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    /// File stem, used to name outputs and tag transactions.
    pub source: String,
    pub path: PathBuf,
    /// One entry per extraction mode, in the order tried.
    pub attempts: Vec<ModeAttempt>,
    pub detection: DetectionOutcome,
    /// Selected table, normalized when amount normalization is enabled.
    pub table: Option<ExtractionResult>,
    /// Parser output; `None` when no parser is configured or no table was found.
    pub parsed: Option<ParseOutcome>,
}

impl DocumentReport {
    pub fn method(&self) -> Option<ExtractionMode> {
        self.table.as_ref().map(|t| t.method)
    }

    pub fn row_count(&self) -> usize {
        self.table.as_ref().map(ExtractionResult::row_count).unwrap_or(0)
    }

    /// True when no mode produced any rows.
    pub fn is_empty(&self) -> bool {
        self.table.is_none()
    }

    /// True when every mode raised an engine error.
    pub fn all_failed(&self) -> bool {
        !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|a| matches!(a.result, AttemptResult::Failed(_)))
    }

    /// Engine errors, one per failed mode.
    pub fn errors(&self) -> Vec<String> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.result {
                AttemptResult::Failed(e) => Some(format!("{}: {}", a.mode, e)),
                _ => None,
            })
            .collect()
    }
}

/// Runs the extraction strategy and post-processing for single documents.
///
/// Holds no per-document state, so one pipeline can process any number of
/// files and gives the same report for the same input.
pub struct DocumentPipeline<E> {
    extractor: StrategyExtractor<E>,
    detector: LocaleDetector,
    parser: Option<Box<dyn DocumentParser + Send + Sync>>,
    normalize_amounts: bool,
}

impl<E: TableEngine> DocumentPipeline<E> {
    pub fn new(engine: E, detector: LocaleDetector) -> Self {
        Self {
            extractor: StrategyExtractor::new(engine),
            detector,
            parser: None,
            normalize_amounts: false,
        }
    }

    /// Build a pipeline from configuration.
    pub fn from_config(engine: E, config: &PdfCtxConfig, registry: Arc<LocaleRegistry>) -> Result<Self> {
        let detector = LocaleDetector::new(registry, &config.locale.default_locale)?
            .with_confidence_threshold(config.locale.confidence_threshold);

        let mut pipeline = Self::new(engine, detector).with_normalization(config.extraction.normalize_amounts);
        if let Some(name) = &config.extraction.parser {
            pipeline = pipeline.with_parser(parser_by_name(name)?);
        }
        Ok(pipeline)
    }

    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extractor = self.extractor.with_pages(pages);
        self
    }

    pub fn with_parser(mut self, parser: Box<dyn DocumentParser + Send + Sync>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_normalization(mut self, enabled: bool) -> Self {
        self.normalize_amounts = enabled;
        self
    }

    pub fn engine(&self) -> &E {
        self.extractor.engine()
    }

    pub fn detector(&self) -> &LocaleDetector {
        &self.detector
    }

    /// Process one document.
    pub fn process(&self, path: &Path, explicit_locale: Option<&str>) -> DocumentReport {
        let source = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let outcome = self.extractor.extract(path);
        let attempts = outcome.attempts;
        let table = outcome.best;

        let detection = self.detector.detect_locale(&filename, table.as_ref(), explicit_locale);
        info!("Locale for {}: {}", filename, detection);

        // Parsers read the rows as extracted; normalization only shapes the output table.
        let parsed = match (&self.parser, &table) {
            (Some(parser), Some(table)) => {
                debug!("Running {} parser on {}", parser.name(), source);
                Some(parser.parse(&table.rows, &source))
            }
            _ => None,
        };

        let table = match table {
            Some(table) if self.normalize_amounts => {
                let locale = self.detector.get_config(&detection.locale);
                Some(TableNormalizer::new(locale).normalize(&table))
            }
            other => other,
        };

        DocumentReport {
            source,
            path: path.to_path_buf(),
            attempts,
            detection,
            table,
            parsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::testing::ScriptedEngine;
    use crate::extraction::{Cell, RawTable};
    use crate::locale::DetectionMethod;
    use crate::parsers::BankStatementParser;
    use pretty_assertions::assert_eq;

    fn detector() -> LocaleDetector {
        LocaleDetector::new(Arc::new(LocaleRegistry::builtin()), "fr").unwrap()
    }

    fn statement() -> RawTable {
        let rows = [
            ["Relevé de compte", "Janvier 2024", "", ""],
            ["Date", "Opération", "Montant", "Solde"],
            ["15/01/2024", "Virement reçu", "1200,00", "3400,00"],
            ["16/01/2024", "Prélèvement loyer", "-650,00", "2750,00"],
        ];
        RawTable::new(
            rows.iter()
                .map(|r| r.iter().map(|c| Cell::from(*c)).collect())
                .collect(),
        )
    }

    fn engine() -> ScriptedEngine {
        ScriptedEngine::new()
            .tables(ExtractionMode::Lattice, &[1])
            .raw(ExtractionMode::Stream, vec![statement()])
            .failing(ExtractionMode::Guess)
    }

    #[test]
    fn test_process_selects_table_and_detects_locale() {
        let pipeline = DocumentPipeline::new(engine(), detector());
        let report = pipeline.process(Path::new("/tmp/scan001.pdf"), None);

        assert_eq!(report.source, "scan001");
        assert_eq!(report.method(), Some(ExtractionMode::Stream));
        assert_eq!(report.row_count(), 4);
        assert_eq!(report.attempts.len(), 3);
        assert!(matches!(report.attempts[2].result, AttemptResult::Failed(_)));
        assert_eq!(report.detection.method, DetectionMethod::Content);
        assert_eq!(report.detection.locale, "fr");
        assert_eq!(report.parsed, None);
    }

    #[test]
    fn test_process_with_parser_and_normalization() {
        let pipeline = DocumentPipeline::new(engine(), detector())
            .with_parser(Box::new(BankStatementParser::new()))
            .with_normalization(true);

        let report = pipeline.process(Path::new("releve_fr.pdf"), None);
        assert_eq!(report.detection.method, DetectionMethod::Filename);

        let table = report.table.as_ref().unwrap();
        assert_eq!(table.rows[1][2], Cell::from("Montant"));
        assert_eq!(table.rows[2][2], Cell::Number(1200.0));
        assert_eq!(table.rows[3][2], Cell::Number(-650.0));

        // Last amount on each row is the running balance.
        let amounts: Vec<f64> = report
            .parsed
            .as_ref()
            .unwrap()
            .transactions()
            .iter()
            .map(|t| t.amount)
            .collect();
        assert_eq!(amounts, vec![3400.0, 2750.0]);
        assert_eq!(report.parsed.unwrap().transactions()[0].source, "releve_fr");
    }

    #[test]
    fn test_no_table_means_no_parse_outcome() {
        let pipeline = DocumentPipeline::new(ScriptedEngine::new(), detector())
            .with_parser(Box::new(BankStatementParser::new()));

        let report = pipeline.process(Path::new("blank.pdf"), Some("de"));
        assert!(report.is_empty());
        assert!(!report.all_failed());
        assert_eq!(report.parsed, None);
        assert_eq!(report.detection.locale, "de");
        assert_eq!(report.detection.method, DetectionMethod::Explicit);
    }

    #[test]
    fn test_table_without_transactions() {
        let engine = ScriptedEngine::new().tables(ExtractionMode::Lattice, &[2]);
        let pipeline = DocumentPipeline::new(engine, detector())
            .with_parser(Box::new(BankStatementParser::new()));

        let report = pipeline.process(Path::new("notes.pdf"), None);
        assert_eq!(report.parsed, Some(ParseOutcome::NoTransactions { rows_scanned: 2 }));
    }

    #[test]
    fn test_every_mode_failing() {
        let engine = ScriptedEngine::new()
            .failing(ExtractionMode::Lattice)
            .failing(ExtractionMode::Stream)
            .failing(ExtractionMode::Guess);
        let report = DocumentPipeline::new(engine, detector()).process(Path::new("broken.pdf"), None);

        assert!(report.is_empty());
        assert!(report.all_failed());
        assert_eq!(report.errors().len(), 3);
        assert!(report.errors()[0].starts_with("lattice: "));
        assert_eq!(report.detection.method, DetectionMethod::Default);
    }

    #[test]
    fn test_from_config() {
        let mut config = PdfCtxConfig::default();
        config.locale.default_locale = "en".to_string();
        config.extraction.parser = Some("bank_statement".to_string());

        let registry = Arc::new(LocaleRegistry::builtin());
        let pipeline = DocumentPipeline::from_config(ScriptedEngine::new(), &config, registry.clone()).unwrap();
        assert_eq!(pipeline.detector().default_locale(), "en");

        config.extraction.parser = Some("payslip".to_string());
        assert!(DocumentPipeline::from_config(ScriptedEngine::new(), &config, registry.clone()).is_err());

        config.extraction.parser = None;
        config.locale.default_locale = "it".to_string();
        assert!(DocumentPipeline::from_config(ScriptedEngine::new(), &config, registry).is_err());
    }

    #[test]
    fn test_processing_is_repeatable() {
        let pipeline = DocumentPipeline::new(engine(), detector())
            .with_parser(Box::new(BankStatementParser::new()));

        let path = Path::new("scan001.pdf");
        assert_eq!(pipeline.process(path, None), pipeline.process(path, None));
    }
}
