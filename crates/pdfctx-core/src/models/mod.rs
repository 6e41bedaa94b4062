//! Configuration and output models.

pub mod config;
pub mod transaction;

pub use transaction::Transaction;
