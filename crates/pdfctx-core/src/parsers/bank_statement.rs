//! Bank statement rows: a date, a description and an amount.

use tracing::{debug, trace};

use super::{DocumentParser, ParseOutcome};
use crate::extraction::{join_row, Cell, Row};
use crate::models::Transaction;
use crate::normalize::patterns::{STATEMENT_AMOUNT, STATEMENT_DATE};

/// Reads one transaction per row that carries both a `DD/MM/YYYY` date and
/// a two-decimal amount.
///
/// The first date and the *last* amount of the row are used. On statements
/// that print a running balance after the transaction amount, the balance is
/// picked up instead of the amount. Cells are joined with spaces before
/// matching, so when the amount cell directly follows the date the year and
/// the amount's integer part read as one amount: `["15/01/2024", "45,50"]`
/// yields `2024 45` → `202445`.
#[derive(Debug, Clone, Default)]
pub struct BankStatementParser;

impl BankStatementParser {
    pub const NAME: &'static str = "bank_statement";

    pub fn new() -> Self {
        Self
    }

    /// Parse a single row; `None` when it is not a transaction line.
    pub fn parse_row(&self, row: &[Cell], source: &str) -> Option<Transaction> {
        let text = join_row(row);

        let date = STATEMENT_DATE.find(&text)?;
        let amount = STATEMENT_AMOUNT.find_iter(&text).last()?;

        let normalized: String = amount
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        match normalized.parse::<f64>() {
            Ok(value) => Some(Transaction {
                date: date.as_str().to_string(),
                description: text.clone(),
                amount: value,
                source: source.to_string(),
            }),
            Err(_) => {
                trace!("Skipping row with unparseable amount '{}': {}", amount.as_str(), text);
                None
            }
        }
    }
}

impl DocumentParser for BankStatementParser {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn parse(&self, rows: &[Row], source: &str) -> ParseOutcome {
        let transactions: Vec<Transaction> = rows
            .iter()
            .filter_map(|row| self.parse_row(row, source))
            .collect();

        debug!(
            "Found {} transactions in {} rows of {}",
            transactions.len(),
            rows.len(),
            source
        );

        if transactions.is_empty() {
            ParseOutcome::NoTransactions {
                rows_scanned: rows.len(),
            }
        } else {
            ParseOutcome::Transactions(transactions)
        }
    }
}
