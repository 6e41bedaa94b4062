//! Amount normalization for French, German and English formatting.

use super::patterns::{CURRENCY_CODE, CURRENCY_SYMBOL};
use super::{ExtractionMatch, FieldExtractor};
use crate::locale::LocaleConfig;

/// Convert a locale-formatted amount string to a number.
///
/// Currency symbols and codes are stripped, whitespace and thousands
/// separators removed, and the decimal separator mapped to `.`. Minus signs
/// are kept; leading plus signs are dropped. Returns `None` for empty or
/// unparseable input.
pub fn clean_amount(text: &str, locale: &LocaleConfig) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let text = CURRENCY_SYMBOL.replace_all(text, "");
    let text = CURRENCY_CODE.replace_all(&text, "");

    let mut cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    cleaned = cleaned.replace(locale.thousands_separator, "");
    if locale.decimal_separator != '.' {
        cleaned = cleaned.replace(locale.decimal_separator, ".");
    }

    cleaned
        .trim_start_matches('+')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Finds amounts in free text using a locale's amount patterns.
///
/// Patterns are tried in order; every match of the first pattern that
/// matches at all is returned.
pub struct AmountExtractor<'a> {
    locale: &'a LocaleConfig,
}

impl<'a> AmountExtractor<'a> {
    pub fn new(locale: &'a LocaleConfig) -> Self {
        Self { locale }
    }
}

impl FieldExtractor for AmountExtractor<'_> {
    type Output = ExtractionMatch<f64>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        for pattern in &self.locale.amount_patterns {
            let results: Vec<_> = pattern
                .find_iter(text)
                .filter_map(|m| {
                    let value = clean_amount(m.as_str(), self.locale)?;
                    Some(ExtractionMatch::new(value, m.as_str().trim()).with_position(m.start(), m.end()))
                })
                .collect();

            if !results.is_empty() {
                return results;
            }
        }

        Vec::new()
    }
}
