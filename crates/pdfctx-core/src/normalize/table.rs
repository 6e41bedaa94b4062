//! Cell-level normalization of an extracted table.

use regex::Regex;
use tracing::debug;

use super::amounts::clean_amount;
use super::patterns::{CURRENCY_CODE, CURRENCY_SYMBOL};
use crate::extraction::{Cell, ExtractionResult};
use crate::locale::LocaleConfig;

/// Converts cells that hold nothing but a locale-formatted amount into numbers.
///
/// A cell qualifies when, once currency markers are removed, it reads as an
/// optionally signed number with the locale's decimal separator followed by
/// exactly two digits. Everything else (dates, integers, text) is left as is.
pub struct TableNormalizer<'a> {
    locale: &'a LocaleConfig,
    amount_cell: Option<Regex>,
}

impl<'a> TableNormalizer<'a> {
    pub fn new(locale: &'a LocaleConfig) -> Self {
        let thousands = if locale.thousands_separator.is_whitespace() {
            r"\s".to_string()
        } else {
            regex::escape(&locale.thousands_separator.to_string())
        };
        let decimal = regex::escape(&locale.decimal_separator.to_string());
        let pattern = format!(r"^[+-]?\s*\d{{1,3}}(?:{thousands}?\d{{3}})*{decimal}\d{{2}}$");

        Self {
            locale,
            amount_cell: Regex::new(&pattern).ok(),
        }
    }

    pub fn normalize_cell(&self, cell: &Cell) -> Cell {
        let (Cell::Text(text), Some(pattern)) = (cell, &self.amount_cell) else {
            return cell.clone();
        };

        let stripped = CURRENCY_SYMBOL.replace_all(text, "");
        let stripped = CURRENCY_CODE.replace_all(&stripped, "");
        if !pattern.is_match(stripped.trim()) {
            return cell.clone();
        }

        match clean_amount(text, self.locale) {
            Some(value) => Cell::Number(value),
            None => cell.clone(),
        }
    }

    /// Normalize every cell, keeping row and column layout.
    pub fn normalize(&self, table: &ExtractionResult) -> ExtractionResult {
        let mut converted = 0usize;
        let rows = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let out = self.normalize_cell(cell);
                        if out != *cell {
                            converted += 1;
                        }
                        out
                    })
                    .collect()
            })
            .collect();

        debug!("Normalized {} amount cells using locale {}", converted, self.locale.code);
        ExtractionResult {
            method: table.method,
            rows,
        }
    }
}
