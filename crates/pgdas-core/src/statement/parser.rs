//! Statement parser: runs every field rule and assembles the record.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::{ExtractionConfig, TributosStrategy};
use crate::models::statement::{DocumentText, ExtractionResult, Tributos};

use super::rules::{
    classify_document, extract_apuracao_period, extract_company_name,
    extract_informed_gross_revenue, extract_matrix_tax_id, extract_period_gross_revenue,
    extract_tributos, extract_tributos_header_row, extract_twelve_month_gross_revenue,
};

/// Extracted record plus diagnostics.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Extracted statement fields.
    pub result: ExtractionResult,
    /// Fields that fell back to the sentinel.
    pub missing_fields: Vec<&'static str>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for statement parsing.
pub trait StatementParser {
    /// Parse a statement from its text.
    ///
    /// Never fails: fields that cannot be located are reported as not found.
    fn parse(&self, text: &str) -> ParseOutcome;

    /// Parse a statement from raw bytes, which must be UTF-8 text.
    fn parse_bytes(&self, bytes: &[u8]) -> Result<ParseOutcome, ExtractionError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.parse(text))
    }
}

/// Rule-based parser for Simples Nacional statements.
#[derive(Debug, Clone, Default)]
pub struct SimplesParser {
    tributos_strategy: TributosStrategy,
}

impl SimplesParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_tributos_strategy(config.tributos_strategy)
    }

    /// Set how the tributos block is read.
    pub fn with_tributos_strategy(mut self, strategy: TributosStrategy) -> Self {
        self.tributos_strategy = strategy;
        self
    }

    fn extract_tributos(&self, text: &str, informed_gross_revenue: Option<&str>) -> Tributos {
        let tributos = match self.tributos_strategy {
            TributosStrategy::AnchorWindow => extract_tributos(text, informed_gross_revenue),
            TributosStrategy::HeaderRow => extract_tributos_header_row(text),
        };
        tributos.unwrap_or_else(Tributos::not_found)
    }

    /// Run every extractor over the document. Each field is independent;
    /// only the tributos block reads another field (the informed revenue).
    fn assemble(&self, text: &DocumentText) -> ExtractionResult {
        let text = text.as_str();
        let informed_gross_revenue = extract_informed_gross_revenue(text);
        let tributos = self.extract_tributos(text, informed_gross_revenue.as_deref());

        ExtractionResult {
            apuracao_period: extract_apuracao_period(text).into(),
            matrix_tax_id: extract_matrix_tax_id(text).into(),
            company_name: extract_company_name(text).into(),
            period_gross_revenue: extract_period_gross_revenue(text).into(),
            twelve_month_gross_revenue: extract_twelve_month_gross_revenue(text).into(),
            informed_gross_revenue: informed_gross_revenue.into(),
            tax_regime: classify_document(text).into(),
            tributos,
        }
    }
}

impl StatementParser for SimplesParser {
    fn parse(&self, text: &str) -> ParseOutcome {
        let start = Instant::now();
        let text = DocumentText::new(text);

        info!("Parsing statement from {} characters of text", text.char_len());

        let result = self.assemble(&text);
        let missing_fields = result.missing_fields();
        if !missing_fields.is_empty() {
            debug!("Fields not found: {}", missing_fields.join(", "));
        }

        ParseOutcome {
            result,
            missing_fields,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::statement::{Field, TaxRegime};

    const HEADER_ROW_STATEMENT: &str = "Período de Apuração: 01/02/2024 a 29/02/2024\n\
        IRPJ CSLL COFINS PIS/Pasep INSS/CPP ICMS IPI ISS Total\n\
        1,00 2,00 3,00 4,00 5,00 6,00 7,00 8,00 36,00\n";

    #[test]
    fn test_parse_empty() {
        let outcome = SimplesParser::new().parse("");
        assert_eq!(outcome.result, ExtractionResult::default());
        assert_eq!(outcome.missing_fields.len(), 8);
    }

    #[test]
    fn test_header_row_strategy() {
        let parser = SimplesParser::new().with_tributos_strategy(TributosStrategy::HeaderRow);
        let outcome = parser.parse(HEADER_ROW_STATEMENT);
        assert_eq!(outcome.result.tributos.total.as_str(), "36,00");
        assert_eq!(outcome.result.apuracao_period.as_str(), "01/02/2024 a 29/02/2024");
        // No anchor: the regime is still unknown
        assert_eq!(outcome.result.tax_regime, Field::<TaxRegime>::NotFound);
    }

    #[test]
    fn test_default_strategy_ignores_header_row() {
        let outcome = SimplesParser::new().parse(HEADER_ROW_STATEMENT);
        assert_eq!(outcome.result.tributos, Tributos::not_found());
        assert!(outcome.missing_fields.contains(&"tributos"));
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let parser = SimplesParser::new();
        assert!(matches!(
            parser.parse_bytes(&[0x50, 0xff, 0x41]),
            Err(ExtractionError::InvalidText(_))
        ));
        assert!(parser.parse_bytes(b"").is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            tributos_strategy: TributosStrategy::HeaderRow,
        };
        let outcome = SimplesParser::from_config(&config).parse(HEADER_ROW_STATEMENT);
        assert!(outcome.result.tributos.is_populated());
    }
}
