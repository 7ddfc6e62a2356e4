//! Labeled-value extraction (`Label: value`).

use regex::Regex;
use tracing::debug;

use super::patterns::{
    APURACAO_PERIOD, CNPJ_MATRIZ, COMPANY_NAME, INFORMED_GROSS_REVENUE, PERIOD_GROSS_REVENUE,
};
use super::{ExtractionMatch, FieldExtractor};

/// Extractor for a value captured right after a fixed label.
///
/// The pattern's first capture group is the value; it is trimmed, and a
/// value that trims to nothing does not count as a match.
pub struct LabeledExtractor {
    /// Output field name, used in logs.
    field: &'static str,
    pattern: &'static Regex,
}

impl LabeledExtractor {
    pub fn new(field: &'static str, pattern: &'static Regex) -> Self {
        Self { field, pattern }
    }

    pub fn apuracao_period() -> Self {
        Self::new("apuracao_period", &APURACAO_PERIOD)
    }

    pub fn matrix_tax_id() -> Self {
        Self::new("matrix_tax_id", &CNPJ_MATRIZ)
    }

    pub fn company_name() -> Self {
        Self::new("company_name", &COMPANY_NAME)
    }

    pub fn period_gross_revenue() -> Self {
        Self::new("period_gross_revenue", &PERIOD_GROSS_REVENUE)
    }

    pub fn informed_gross_revenue() -> Self {
        Self::new("informed_gross_revenue", &INFORMED_GROSS_REVENUE)
    }
}

impl FieldExtractor for LabeledExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let found = self.extract_all(text).into_iter().next();
        match &found {
            Some(m) => debug!("{}: {:?} at {:?}", self.field, m.value, m.position),
            None => debug!("{}: not found", self.field),
        }
        found
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let value = caps.get(1)?.as_str().trim();
                if value.is_empty() {
                    return None;
                }
                Some(
                    ExtractionMatch::new(value.to_string())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Assessment period, `DD/MM/YYYY a DD/MM/YYYY`.
pub fn extract_apuracao_period(text: &str) -> Option<String> {
    LabeledExtractor::apuracao_period().extract(text).map(|m| m.value)
}

/// Head-office CNPJ as printed.
pub fn extract_matrix_tax_id(text: &str) -> Option<String> {
    LabeledExtractor::matrix_tax_id().extract(text).map(|m| m.value)
}

pub fn extract_company_name(text: &str) -> Option<String> {
    LabeledExtractor::company_name().extract(text).map(|m| m.value)
}

/// First currency token after "Receita Bruta do PA" on the same line.
pub fn extract_period_gross_revenue(text: &str) -> Option<String> {
    LabeledExtractor::period_gross_revenue().extract(text).map(|m| m.value)
}

pub fn extract_informed_gross_revenue(text: &str) -> Option<String> {
    LabeledExtractor::informed_gross_revenue().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period() {
        let text = "PERÍODO DE APURAÇÃO: 01/03/2024 a 31/03/2024\nCNPJ Matriz: 12.345.678/0001-90";
        assert_eq!(extract_apuracao_period(text), Some("01/03/2024 a 31/03/2024".to_string()));
        assert_eq!(extract_apuracao_period("Período de Apuração: 03/2024"), None);
    }

    #[test]
    fn test_matrix_tax_id() {
        let text = "cnpj matriz:   12.345.678/0001-90  Nome empresarial: ACME";
        assert_eq!(extract_matrix_tax_id(text), Some("12.345.678/0001-90".to_string()));
        assert_eq!(extract_matrix_tax_id("CNPJ Matriz: --"), None);
    }

    #[test]
    fn test_company_name_rest_of_line() {
        let text = "Nome empresarial: ACME COMERCIO LTDA   \nData de abertura: 01/01/2010";
        assert_eq!(extract_company_name(text), Some("ACME COMERCIO LTDA".to_string()));
    }

    #[test]
    fn test_company_name_on_next_line() {
        let text = "Nome empresarial:\nACME COMERCIO LTDA";
        assert_eq!(extract_company_name(text), Some("ACME COMERCIO LTDA".to_string()));
    }

    #[test]
    fn test_period_gross_revenue_first_token_after_label() {
        let text = "Receita Bruta do PA (RPA) - Competência 15.000,00 15.000,00 0,00";
        assert_eq!(extract_period_gross_revenue(text), Some("15.000,00".to_string()));
        assert_eq!(extract_period_gross_revenue("Receita Bruta do PA\n15.000,00"), None);
    }

    #[test]
    fn test_informed_gross_revenue() {
        let text = "Receita Bruta Informada: R$ 1.234.567,89";
        assert_eq!(extract_informed_gross_revenue(text), Some("1.234.567,89".to_string()));
        assert_eq!(extract_informed_gross_revenue("Receita Bruta Informada: 10,00"), None);
    }

    #[test]
    fn test_extract_all_reports_positions() {
        let text = "CNPJ Matriz: 11.111.111/0001-11\nCNPJ Matriz: 22.222.222/0001-22";
        let matches = LabeledExtractor::matrix_tax_id().extract_all(text);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].position, Some((0, 31)));
        assert_eq!(matches[1].value, "22.222.222/0001-22");
    }
}
