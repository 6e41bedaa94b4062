//! Date substring extraction.
//!
//! Dates are returned as matched; no calendar validation takes place.

use super::{ExtractionMatch, FieldExtractor};
use crate::locale::LocaleConfig;

/// Return the first date found by the first of the locale's patterns that matches.
pub fn extract_date(text: &str, locale: &LocaleConfig) -> Option<String> {
    DateExtractor::new(locale).extract(text).map(|m| m.value)
}

/// Date field extractor driven by a locale's ordered date patterns.
pub struct DateExtractor<'a> {
    locale: &'a LocaleConfig,
}

impl<'a> DateExtractor<'a> {
    pub fn new(locale: &'a LocaleConfig) -> Self {
        Self { locale }
    }
}

impl FieldExtractor for DateExtractor<'_> {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        // Earlier patterns win even when a later one matches further left.
        self.locale.date_patterns.iter().find_map(|pattern| {
            pattern.find(text).map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        for pattern in &self.locale.date_patterns {
            let results: Vec<_> = pattern
                .find_iter(text)
                .map(|m| {
                    ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                        .with_position(m.start(), m.end())
                })
                .collect();

            if !results.is_empty() {
                return results;
            }
        }

        Vec::new()
    }
}
