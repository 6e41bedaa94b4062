//! Built-in French, German and English locale data.

use lazy_static::lazy_static;
use regex::Regex;

use super::LocaleConfig;

lazy_static! {
    // French
    static ref FR_DATE_SLASH: Regex = Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").unwrap();
    static ref FR_DATE_DOT: Regex = Regex::new(r"\d{1,2}\.\d{1,2}\.\d{4}").unwrap();
    static ref FR_DATE_LONG: Regex = Regex::new(
        r"\d{1,2}\s+(?:janvier|février|mars|avril|mai|juin|juillet|août|septembre|octobre|novembre|décembre)\s+\d{4}"
    ).unwrap();
    static ref FR_AMOUNT: Regex = Regex::new(r"[+-]?\s*\d+[\s,]\d{2}\s*€?").unwrap();
    static ref FR_AMOUNT_EUR: Regex = Regex::new(r"[+-]?\s*\d+,\d{2}\s*EUR").unwrap();

    // German
    static ref DE_DATE_DOT: Regex = Regex::new(r"\d{1,2}\.\d{1,2}\.\d{4}").unwrap();
    static ref DE_DATE_SLASH: Regex = Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").unwrap();
    static ref DE_DATE_LONG: Regex = Regex::new(
        r"\d{1,2}\s+(?:Januar|Februar|März|April|Mai|Juni|Juli|August|September|Oktober|November|Dezember)\s+\d{4}"
    ).unwrap();
    static ref DE_AMOUNT_GROUPED: Regex = Regex::new(r"[+-]?\s*\d+[\.,]\d{3}[\.,]\d{2}").unwrap();
    static ref DE_AMOUNT: Regex = Regex::new(r"[+-]?\s*\d+,\d{2}\s*€?").unwrap();
    static ref DE_AMOUNT_EUR: Regex = Regex::new(r"[+-]?\s*\d+,\d{2}\s*EUR").unwrap();

    // English
    static ref EN_DATE_SLASH: Regex = Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").unwrap();
    static ref EN_DATE_ISO: Regex = Regex::new(r"\d{4}-\d{1,2}-\d{1,2}").unwrap();
    static ref EN_DATE_LONG: Regex = Regex::new(
        r"\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}"
    ).unwrap();
    static ref EN_AMOUNT_GROUPED: Regex = Regex::new(r"[+-]?\s*\$?\d+,\d{3}\.\d{2}").unwrap();
    static ref EN_AMOUNT: Regex = Regex::new(r"[+-]?\s*\d+\.\d{2}\s*(?:USD|EUR|GBP)?").unwrap();
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

pub(super) fn french() -> LocaleConfig {
    LocaleConfig {
        code: "fr".to_string(),
        name: "French".to_string(),
        date_patterns: vec![FR_DATE_SLASH.clone(), FR_DATE_DOT.clone(), FR_DATE_LONG.clone()],
        amount_patterns: vec![FR_AMOUNT.clone(), FR_AMOUNT_EUR.clone()],
        decimal_separator: ',',
        thousands_separator: ' ',
        keywords: words(&[
            "solde", "crédit", "débit", "virement", "prélèvement",
            "montant", "date", "opération", "facture", "relevé",
            "janvier", "février", "mars", "avril", "mai", "juin",
            "juillet", "août", "septembre", "octobre", "novembre", "décembre",
        ]),
        filename_hints: words(&["_fr", "-fr", "french", "francais", "français", "france"]),
    }
}

pub(super) fn german() -> LocaleConfig {
    LocaleConfig {
        code: "de".to_string(),
        name: "German".to_string(),
        date_patterns: vec![DE_DATE_DOT.clone(), DE_DATE_SLASH.clone(), DE_DATE_LONG.clone()],
        amount_patterns: vec![
            DE_AMOUNT_GROUPED.clone(),
            DE_AMOUNT.clone(),
            DE_AMOUNT_EUR.clone(),
        ],
        decimal_separator: ',',
        thousands_separator: '.',
        keywords: words(&[
            "saldo", "kredit", "lastschrift", "überweisung", "betrag",
            "datum", "buchung", "rechnung", "kontoauszug",
            "januar", "februar", "märz", "april", "mai", "juni",
            "juli", "august", "september", "oktober", "november", "dezember",
        ]),
        filename_hints: words(&["_de", "-de", "german", "deutsch", "deutschland", "germany"]),
    }
}

pub(super) fn english() -> LocaleConfig {
    LocaleConfig {
        code: "en".to_string(),
        name: "English".to_string(),
        date_patterns: vec![EN_DATE_SLASH.clone(), EN_DATE_ISO.clone(), EN_DATE_LONG.clone()],
        amount_patterns: vec![EN_AMOUNT_GROUPED.clone(), EN_AMOUNT.clone()],
        decimal_separator: '.',
        thousands_separator: ',',
        keywords: words(&[
            "balance", "credit", "debit", "transfer", "payment",
            "amount", "date", "transaction", "invoice", "statement",
            "january", "february", "march", "april", "may", "june",
            "july", "august", "september", "october", "november", "december",
        ]),
        filename_hints: words(&["_en", "-en", "english", "uk", "usa", "us"]),
    }
}
