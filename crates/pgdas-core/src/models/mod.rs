//! Data models for statement extraction.

pub mod config;
pub mod statement;

pub use config::{ExtractionConfig, PdfConfig, PgdasConfig, ServerConfig, TributosStrategy};
pub use statement::{DocumentText, ExtractionResult, Field, TaxRegime, Tributos, NOT_FOUND};
