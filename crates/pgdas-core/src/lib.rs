//! Core library for Simples Nacional (PGDAS-D) statement processing.
//!
//! This crate provides:
//! - PDF text extraction for statement uploads
//! - The fiscal field-extraction engine (period, CNPJ, revenues, regime, tributos)
//! - Statement data models and configuration

pub mod error;
pub mod models;
pub mod pdf;
pub mod statement;

pub use error::{ExtractionError, PdfError, PgdasError, Result};
pub use models::config::PgdasConfig;
pub use models::statement::{DocumentText, ExtractionResult, Field, TaxRegime, Tributos, NOT_FOUND};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use statement::{extract, extract_bytes, extract_optional, ParseOutcome, SimplesParser, StatementParser};
