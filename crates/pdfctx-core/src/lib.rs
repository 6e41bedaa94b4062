//! Core library for locale-aware PDF table extraction.
//!
//! This crate provides:
//! - Multi-strategy table extraction through tabula-java
//! - French, German and English locale profiles and locale detection
//! - Amount and date normalization
//! - Bank statement transaction parsing

pub mod error;
pub mod extraction;
pub mod locale;
pub mod models;
pub mod normalize;
pub mod parsers;
pub mod pipeline;

pub use error::{EngineError, LocaleError, PdfCtxError, Result};
pub use extraction::{
    join_row, Cell, ExtractionMode, ExtractionResult, PageSelection, RawTable, Row,
    StrategyExtractor, StrategyOutcome, TableEngine, TabulaEngine,
};
pub use locale::{DetectionMethod, DetectionOutcome, LocaleConfig, LocaleDetector, LocaleRegistry};
pub use models::config::PdfCtxConfig;
pub use models::Transaction;
pub use normalize::{clean_amount, extract_date, TableNormalizer};
pub use parsers::{available_parsers, parser_by_name, BankStatementParser, DocumentParser, ParseOutcome};
pub use pipeline::{DocumentPipeline, DocumentReport};
