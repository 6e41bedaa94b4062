//! Locale-independent regex patterns.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Currency markers stripped before amount conversion
    pub static ref CURRENCY_SYMBOL: Regex = Regex::new(r"[€$£¥]").unwrap();

    pub static ref CURRENCY_CODE: Regex = Regex::new(r"(?i)EUR|USD|GBP|CHF").unwrap();

    // Simplified statement patterns: DD/MM/YYYY and a two-decimal amount
    pub static ref STATEMENT_DATE: Regex = Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").unwrap();

    pub static ref STATEMENT_AMOUNT: Regex = Regex::new(r"[+-]?\s*\d+[,\s]\d{2}").unwrap();
}
