//! Error types for the pgdas-core library.

use thiserror::Error;

/// Main error type for the pgdas library.
#[derive(Error, Debug)]
pub enum PgdasError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF has more pages than the configured limit.
    #[error("PDF has {pages} pages, limit is {limit}")]
    TooManyPages { pages: usize, limit: usize },

    /// The PDF renders to no usable text (image-only or corrupt).
    #[error("no extractable text in PDF")]
    NoText,
}

/// Errors raised by the extraction engine.
///
/// A field that is merely absent from the document is never an error; it is
/// reported through the `NotFound` sentinel instead.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No document text was supplied at all.
    #[error("no document text supplied")]
    MissingInput,

    /// The supplied bytes are not valid UTF-8 text.
    #[error("document is not valid UTF-8 text: {0}")]
    InvalidText(#[from] std::str::Utf8Error),
}

impl PdfError {
    /// Whether the error was caused by the uploaded document rather than by
    /// the service itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PdfError::TextExtraction(_))
    }
}

/// Result type for the pgdas library.
pub type Result<T> = std::result::Result<T, PgdasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_text_converts() {
        let bytes = vec![0xff, 0xfe];
        let err: ExtractionError = std::str::from_utf8(&bytes).unwrap_err().into();
        let err: PgdasError = err.into();
        assert!(matches!(err, PgdasError::Extraction(ExtractionError::InvalidText(_))));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(PdfError::NoText.is_client_error());
        assert!(PdfError::Encrypted.is_client_error());
        assert!(!PdfError::TextExtraction("boom".to_string()).is_client_error());
    }
}
