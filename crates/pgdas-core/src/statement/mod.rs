//! Simples Nacional statement field extraction.
//!
//! The engine is a pure function of the document text: no I/O, no state
//! kept between calls. A field whose pattern is absent comes back as the
//! not-found sentinel; one field failing never affects another.

mod parser;
pub mod rules;

pub use parser::{ParseOutcome, SimplesParser, StatementParser};

use crate::error::ExtractionError;
use crate::models::statement::ExtractionResult;

/// Extract every field from statement text with the default parser.
pub fn extract(text: &str) -> ExtractionResult {
    SimplesParser::new().parse(text).result
}

/// Extract from raw bytes; fails only if they are not UTF-8 text.
pub fn extract_bytes(bytes: &[u8]) -> Result<ExtractionResult, ExtractionError> {
    SimplesParser::new().parse_bytes(bytes).map(|o| o.result)
}

/// Extract from text that may be absent.
///
/// Absent input is an error, distinct from text that merely lacks the
/// expected fields.
pub fn extract_optional(text: Option<&str>) -> Result<ExtractionResult, ExtractionError> {
    text.map(extract).ok_or(ExtractionError::MissingInput)
}
