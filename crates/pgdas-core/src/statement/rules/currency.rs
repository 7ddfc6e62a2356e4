//! Decimal-currency token extraction.
//!
//! Tokens are returned as the matched text; nothing here parses them into
//! numbers, so `1.234,56` comes back exactly as printed.

use super::patterns::CURRENCY_TOKEN;
use super::{ExtractionMatch, FieldExtractor};

/// Currency token extractor.
pub struct CurrencyTokenExtractor;

impl CurrencyTokenExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrencyTokenExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyTokenExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        CURRENCY_TOKEN.find(text).map(|m| {
            ExtractionMatch::new(m.as_str().to_string())
                .with_position(m.start(), m.end())
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CURRENCY_TOKEN
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// First currency token in `text`.
pub fn first_currency_token(text: &str) -> Option<String> {
    CurrencyTokenExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_all_in_document_order() {
        let extractor = CurrencyTokenExtractor::new();
        let results = extractor.extract_all("IRPJ 1.000,00\nCSLL 250,50 total 1.250,50");
        let values: Vec<_> = results.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["1.000,00", "250,50", "1.250,50"]);
        assert_eq!(results[0].position, Some((5, 13)));
    }

    #[test]
    fn test_first_currency_token() {
        assert_eq!(first_currency_token("R$ 12.345,67 e 8,90"), Some("12.345,67".to_string()));
        assert_eq!(first_currency_token("sem valores 01/2024"), None);
    }
}
