//! Domain parsers that turn extracted rows into structured records.

mod bank_statement;

pub use bank_statement::BankStatementParser;

use crate::error::{PdfCtxError, Result};
use crate::extraction::Row;
use crate::models::Transaction;

/// What a parser found in a table.
///
/// A document with no table at all has no `ParseOutcome`; this type only
/// describes tables that were scanned.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Transactions(Vec<Transaction>),
    /// Every row was scanned and none qualified.
    NoTransactions { rows_scanned: usize },
}

impl ParseOutcome {
    pub fn transactions(&self) -> &[Transaction] {
        match self {
            ParseOutcome::Transactions(t) => t,
            ParseOutcome::NoTransactions { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions().is_empty()
    }
}

/// Trait for domain parsers.
pub trait DocumentParser {
    /// Registry name, e.g. "bank_statement".
    fn name(&self) -> &str;

    /// Parse rows extracted from the document identified by `source`.
    fn parse(&self, rows: &[Row], source: &str) -> ParseOutcome;
}

const PARSERS: &[&str] = &[BankStatementParser::NAME];

/// Names of every registered parser.
pub fn available_parsers() -> &'static [&'static str] {
    PARSERS
}

/// Look up a parser by name.
pub fn parser_by_name(name: &str) -> Result<Box<dyn DocumentParser + Send + Sync>> {
    match name {
        BankStatementParser::NAME => Ok(Box::new(BankStatementParser::new())),
        _ => Err(PdfCtxError::UnknownParser {
            name: name.to_string(),
            available: PARSERS.join(", "),
        }),
    }
}
