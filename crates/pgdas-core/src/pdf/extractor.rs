//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;
use crate::models::statement::DocumentText;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Statements are sometimes saved with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf_extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        catch_extraction_panic(|| pdf_extract::extract_text_from_mem(&self.raw_data))
    }
}

/// Run a text extraction call, turning both its error and a panic inside
/// it into [`PdfError::TextExtraction`]. pdf-extract's font parsers panic
/// on some embedded fonts.
fn catch_extraction_panic<F, E>(extract: F) -> Result<String>
where
    F: FnOnce() -> std::result::Result<String, E>,
    E: std::fmt::Display,
{
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(extract)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(PdfError::TextExtraction(e.to_string())),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!("pdf-extract panicked: {}", message);
            Err(PdfError::TextExtraction(format!("extractor panicked: {}", message)))
        }
    }
}

/// Check for the `%PDF-` header.
pub fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Turn uploaded PDF bytes into document text for the extraction engine.
///
/// Fails with [`PdfError::NoText`] when the document renders to less than
/// `min_text_length` characters, e.g. scanned or image-only statements.
pub fn extract_document_text(data: &[u8], config: &PdfConfig) -> Result<DocumentText> {
    let mut extractor = PdfExtractor::new();
    extractor.load(data)?;

    let pages = extractor.page_count() as usize;
    if config.max_pages > 0 && pages > config.max_pages {
        return Err(PdfError::TooManyPages {
            pages,
            limit: config.max_pages,
        });
    }

    let text = DocumentText::new(&extractor.extract_text()?);
    let chars = text.char_len();
    debug!("Extracted {} characters from {} pages", chars, pages);

    if text.is_empty() || chars < config.min_text_length {
        return Err(PdfError::NoText);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.extract_text().is_err());
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(!is_pdf(b"PK\x03\x04"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let result = extract_document_text(b"%PDF-1.4 not really a pdf", &PdfConfig::default());
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    /// One Helvetica page per entry; an empty entry is a page with no text.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_extracts_page_text() {
        let data = build_pdf(&["Periodo de Apuracao: 01/01/2024 a 31/01/2024"]);
        assert!(is_pdf(&data));

        let text = extract_document_text(&data, &PdfConfig::default()).unwrap();
        assert!(text.as_str().contains("01/01/2024 a 31/01/2024"));
    }

    #[test]
    fn test_page_without_text_is_no_text() {
        let data = build_pdf(&[""]);
        let result = extract_document_text(&data, &PdfConfig::default());
        assert!(matches!(result, Err(PdfError::NoText)));
    }

    #[test]
    fn test_text_under_min_length_is_no_text() {
        let data = build_pdf(&["curto"]);
        let config = PdfConfig {
            min_text_length: 100,
            ..PdfConfig::default()
        };
        assert!(matches!(extract_document_text(&data, &config), Err(PdfError::NoText)));
    }

    #[test]
    fn test_page_limit() {
        let data = build_pdf(&["primeira", "segunda"]);
        let config = PdfConfig {
            max_pages: 1,
            ..PdfConfig::default()
        };
        assert!(matches!(
            extract_document_text(&data, &config),
            Err(PdfError::TooManyPages { pages: 2, limit: 1 })
        ));

        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();
        assert_eq!(extractor.page_count(), 2);
    }

    #[test]
    fn test_extraction_panic_becomes_error() {
        let result = catch_extraction_panic(|| -> std::result::Result<String, String> {
            panic!("bad font")
        });
        match result {
            Err(PdfError::TextExtraction(message)) => assert!(message.contains("bad font")),
            other => panic!("unexpected result: {:?}", other),
        }

        let result = catch_extraction_panic(|| Err::<String, _>("broken stream"));
        assert!(matches!(result, Err(PdfError::TextExtraction(m)) if m == "broken stream"));
        assert_eq!(catch_extraction_panic(|| Ok::<_, String>("ok".to_string())).unwrap(), "ok");
    }
}
