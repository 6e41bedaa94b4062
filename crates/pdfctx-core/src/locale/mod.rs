//! Locale profiles and locale detection.
//!
//! A [`LocaleRegistry`] is built once at startup and shared read-only
//! (usually behind an `Arc`) with every component that needs locale data.

mod builtin;
mod detector;

pub use detector::{
    keyword_ratio, ContentDetection, DetectionMethod, DetectionOutcome, LocaleDetector,
    DEFAULT_CONFIDENCE_THRESHOLD,
};

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::LocaleError;

/// Formatting conventions and vocabulary of one language/region.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Short identifier, e.g. "fr".
    pub code: String,
    /// Display name, e.g. "French".
    pub name: String,
    /// Date patterns, tried in order (first match wins).
    pub date_patterns: Vec<Regex>,
    /// Amount patterns, tried in order.
    pub amount_patterns: Vec<Regex>,
    pub decimal_separator: char,
    pub thousands_separator: char,
    /// Lowercase words typical of documents in this locale.
    pub keywords: Vec<String>,
    /// Lowercase filename fragments that indicate this locale.
    pub filename_hints: Vec<String>,
}

impl LocaleConfig {
    fn validate(&self) -> Result<(), LocaleError> {
        if self.decimal_separator == self.thousands_separator {
            return Err(LocaleError::AmbiguousSeparators {
                code: self.code.clone(),
                separator: self.decimal_separator,
            });
        }
        Ok(())
    }
}

/// Immutable set of locale configs keyed by code, in registration order.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

impl LocaleRegistry {
    /// Registry with the built-in French, German and English profiles (in that order).
    pub fn builtin() -> Self {
        Self {
            locales: vec![builtin::french(), builtin::german(), builtin::english()],
        }
    }

    /// Build a registry from custom configs.
    pub fn from_configs(locales: Vec<LocaleConfig>) -> Result<Self, LocaleError> {
        for (i, locale) in locales.iter().enumerate() {
            locale.validate()?;
            if locales[..i].iter().any(|l| l.code == locale.code) {
                return Err(LocaleError::Duplicate(locale.code.clone()));
            }
        }
        Ok(Self { locales })
    }

    /// Look up a locale by code.
    pub fn get(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|l| l.code == code)
    }

    /// Look up a locale by code, failing with the list of known codes.
    pub fn require(&self, code: &str) -> Result<&LocaleConfig, LocaleError> {
        self.get(code).ok_or_else(|| LocaleError::Unknown {
            code: code.to_string(),
            available: self.codes().join(", "),
        })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Iterate locales in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &LocaleConfig> {
        self.locales.iter()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.locales.iter().map(|l| l.code.as_str()).collect()
    }

    /// Map of locale code to display name.
    pub fn list_available_locales(&self) -> BTreeMap<String, String> {
        self.locales
            .iter()
            .map(|l| (l.code.clone(), l.name.clone()))
            .collect()
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
