//! Locale detection from an explicit choice, the filename, or table content.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{LocaleConfig, LocaleRegistry};
use crate::error::LocaleError;
use crate::extraction::ExtractionResult;

/// Minimum keyword ratio for content-based detection.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Which signal decided the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    Explicit,
    Filename,
    Content,
    Default,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Explicit => "explicit",
            DetectionMethod::Filename => "filename",
            DetectionMethod::Content => "content",
            DetectionMethod::Default => "default",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected locale and how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionOutcome {
    pub locale: String,
    pub method: DetectionMethod,
    /// Keyword ratio; only set for [`DetectionMethod::Content`].
    pub confidence: Option<f64>,
}

impl DetectionOutcome {
    fn new(locale: impl Into<String>, method: DetectionMethod) -> Self {
        Self {
            locale: locale.into(),
            method,
            confidence: None,
        }
    }
}

impl fmt::Display for DetectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.confidence {
            Some(c) => write!(f, "{} ({}, confidence: {:.2}%)", self.locale, self.method, c * 100.0),
            None => write!(f, "{} ({})", self.locale, self.method),
        }
    }
}

/// Result of keyword scoring over a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDetection {
    /// Best-scoring locale, if it reached the threshold.
    pub locale: Option<String>,
    /// Score of the best-scoring locale.
    pub confidence: f64,
}

/// Fraction of `keywords` that occur as substrings of `text`.
///
/// `text` is expected to be lower-cased already.
pub fn keyword_ratio<S: AsRef<str>>(text: &str, keywords: &[S]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }

    let found = keywords
        .iter()
        .filter(|k| text.contains(&k.as_ref().to_lowercase()))
        .count();
    found as f64 / keywords.len() as f64
}

/// Picks a locale for a document.
///
/// Signals are checked in strict priority order: explicit, filename,
/// content, default. The first one that yields a locale wins.
#[derive(Debug, Clone)]
pub struct LocaleDetector {
    registry: Arc<LocaleRegistry>,
    default_config: LocaleConfig,
    confidence_threshold: f64,
}

impl LocaleDetector {
    /// Create a detector; fails if `default_locale` is not registered.
    pub fn new(registry: Arc<LocaleRegistry>, default_locale: &str) -> Result<Self, LocaleError> {
        let default_config = registry.require(default_locale)?.clone();

        Ok(Self {
            registry,
            default_config,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        })
    }

    /// Set the minimum keyword ratio for content detection.
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_config.code
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Config for `code`, or the default locale's config when `code` is unknown.
    pub fn get_config(&self, code: &str) -> &LocaleConfig {
        self.registry.get(code).unwrap_or(&self.default_config)
    }

    /// First locale (in registry order) whose filename hints occur in `filename`.
    pub fn detect_from_filename(&self, filename: &str) -> Option<&str> {
        let filename = filename.to_lowercase();

        self.registry
            .iter()
            .find(|locale| locale.filename_hints.iter().any(|hint| filename.contains(hint.as_str())))
            .map(|locale| locale.code.as_str())
    }

    /// Score each locale's keywords against the table text.
    pub fn detect_from_content(&self, table: &ExtractionResult) -> ContentDetection {
        let text = table
            .values()
            .map(|v| v.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            return ContentDetection {
                locale: None,
                confidence: 0.0,
            };
        }

        let mut best: Option<(&str, f64)> = None;
        for locale in self.registry.iter() {
            let score = keyword_ratio(&text, locale.keywords.as_slice());
            debug!("Keyword score for {}: {:.3}", locale.code, score);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((locale.code.as_str(), score));
            }
        }

        match best {
            Some((code, confidence)) if confidence >= self.confidence_threshold => ContentDetection {
                locale: Some(code.to_string()),
                confidence,
            },
            Some((_, confidence)) => ContentDetection {
                locale: None,
                confidence,
            },
            None => ContentDetection {
                locale: None,
                confidence: 0.0,
            },
        }
    }

    /// Detect the locale of a document.
    pub fn detect_locale(
        &self,
        filename: &str,
        table: Option<&ExtractionResult>,
        explicit_locale: Option<&str>,
    ) -> DetectionOutcome {
        if let Some(code) = explicit_locale {
            if self.registry.contains(code) {
                return DetectionOutcome::new(code, DetectionMethod::Explicit);
            }
            warn!(
                "Unknown locale '{}' (available: {}), detecting instead",
                code,
                self.registry.codes().join(", ")
            );
        }

        if let Some(code) = self.detect_from_filename(filename) {
            return DetectionOutcome::new(code, DetectionMethod::Filename);
        }

        if let Some(table) = table {
            let content = self.detect_from_content(table);
            if let Some(code) = content.locale {
                return DetectionOutcome {
                    locale: code,
                    method: DetectionMethod::Content,
                    confidence: Some(content.confidence),
                };
            }
        }

        DetectionOutcome::new(self.default_config.code.clone(), DetectionMethod::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{Cell, ExtractionMode};
    use pretty_assertions::assert_eq;

    fn detector() -> LocaleDetector {
        LocaleDetector::new(Arc::new(LocaleRegistry::builtin()), "fr").unwrap()
    }

    fn table(cells: &[&str]) -> ExtractionResult {
        ExtractionResult {
            method: ExtractionMode::Stream,
            rows: cells.iter().map(|c| vec![Cell::from(*c)]).collect(),
        }
    }

    fn french_table() -> ExtractionResult {
        // solde, virement, prélèvement, montant, date, opération, relevé, janvier
        table(&[
            "Date",
            "Opération",
            "Montant",
            "Solde",
            "Virement",
            "Prélèvement",
            "Relevé de janvier",
        ])
    }

    #[test]
    fn test_keyword_ratio() {
        assert_eq!(keyword_ratio("solde et virement", &["solde", "virement", "crédit", "débit"]), 0.5);
        assert_eq!(keyword_ratio("anything", &[] as &[&str]), 0.0);
        assert_eq!(keyword_ratio("", &["saldo"]), 0.0);
    }

    #[test]
    fn test_unknown_default_locale_is_error() {
        let err = LocaleDetector::new(Arc::new(LocaleRegistry::builtin()), "it").unwrap_err();
        assert!(matches!(err, LocaleError::Unknown { .. }));
    }

    #[test]
    fn test_explicit_wins() {
        let outcome = detector().detect_locale("kontoauszug_de.pdf", Some(&french_table()), Some("en"));
        assert_eq!(outcome, DetectionOutcome::new("en", DetectionMethod::Explicit));
    }

    #[test]
    fn test_unknown_explicit_falls_through_to_filename() {
        let outcome = detector().detect_locale("kontoauszug_de.pdf", None, Some("xx"));
        assert_eq!(outcome, DetectionOutcome::new("de", DetectionMethod::Filename));
    }

    #[test]
    fn test_filename_beats_content() {
        let outcome = detector().detect_locale("statement_de.pdf", Some(&french_table()), None);
        assert_eq!(outcome.locale, "de");
        assert_eq!(outcome.method, DetectionMethod::Filename);
        assert_eq!(outcome.confidence, None);
    }

    #[test]
    fn test_filename_registry_order() {
        let detector = detector();
        assert_eq!(detector.detect_from_filename("Releve-FR-2024.pdf"), Some("fr"));
        assert_eq!(detector.detect_from_filename("Deutschland_Rechnung.pdf"), Some("de"));
        assert_eq!(detector.detect_from_filename("invoice_en.pdf"), Some("en"));
        // French hints are checked before English ones.
        assert_eq!(detector.detect_from_filename("france_usa.pdf"), Some("fr"));
        assert_eq!(detector.detect_from_filename("scan001.pdf"), None);
    }

    #[test]
    fn test_content_detection_above_threshold() {
        let detector = detector();
        let content = detector.detect_from_content(&french_table());
        assert_eq!(content.locale.as_deref(), Some("fr"));
        assert_eq!(content.confidence, 8.0 / 22.0);

        let outcome = detector.detect_locale("scan001.pdf", Some(&french_table()), None);
        assert_eq!(outcome.method, DetectionMethod::Content);
        assert_eq!(outcome.confidence, Some(8.0 / 22.0));
        assert_eq!(outcome.to_string(), "fr (content, confidence: 36.36%)");
    }

    #[test]
    fn test_content_detection_german() {
        let content = detector().detect_from_content(&table(&[
            "Datum Buchung Betrag",
            "Überweisung Miete",
            "Lastschrift Strom",
            "Saldo",
            "Kontoauszug Januar",
        ]));
        // datum, buchung, betrag, überweisung, lastschrift, saldo, kontoauszug, januar
        assert_eq!(content.locale.as_deref(), Some("de"));
        assert_eq!(content.confidence, 8.0 / 21.0);
    }

    #[test]
    fn test_content_below_threshold() {
        let detector = detector();
        let sparse = table(&["Total", "Amount 12.00"]);

        let content = detector.detect_from_content(&sparse);
        assert_eq!(content.locale, None);
        assert_eq!(content.confidence, 1.0 / 22.0);

        let outcome = detector.detect_locale("scan001.pdf", Some(&sparse), None);
        assert_eq!(outcome, DetectionOutcome::new("fr", DetectionMethod::Default));
    }

    #[test]
    fn test_custom_threshold() {
        let detector = detector().with_confidence_threshold(0.5);
        let content = detector.detect_from_content(&french_table());
        assert_eq!(content.locale, None);
    }

    #[test]
    fn test_score_equal_to_threshold_is_accepted() {
        let mut fr = LocaleRegistry::builtin().get("fr").unwrap().clone();
        fr.keywords = [
            "solde", "virement", "montant", "débit", "crédit", "agence", "frais", "carte", "chèque", "retrait",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();
        fr.filename_hints.clear();
        let registry = Arc::new(LocaleRegistry::from_configs(vec![fr]).unwrap());
        let detector = LocaleDetector::new(registry, "fr").unwrap();

        // 3 of 10 keywords: exactly the default threshold.
        let content = detector.detect_from_content(&table(&["Solde", "Virement", "Montant", "Libellé"]));
        assert_eq!(content.confidence, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(content.locale.as_deref(), Some("fr"));

        // Same boundary with a configured threshold on the builtin profiles.
        let detector = self::detector().with_confidence_threshold(8.0 / 22.0);
        let content = detector.detect_from_content(&french_table());
        assert_eq!(content.locale.as_deref(), Some("fr"));
    }

    #[test]
    fn test_empty_table() {
        let content = detector().detect_from_content(&table(&[]));
        assert_eq!(content, ContentDetection { locale: None, confidence: 0.0 });
    }

    #[test]
    fn test_detection_is_idempotent() {
        let detector = detector();
        let table = french_table();
        let first = detector.detect_locale("scan001.pdf", Some(&table), None);
        let second = detector.detect_locale("scan001.pdf", Some(&table), None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_get_config_falls_back_to_default() {
        let detector = detector();
        assert_eq!(detector.get_config("de").code, "de");
        assert_eq!(detector.get_config("zz").code, "fr");
    }
}
