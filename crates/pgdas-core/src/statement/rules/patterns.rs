//! Common regex patterns for Simples Nacional statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Decimal-currency token: `.` groups thousands, `,` separates exactly two
/// cents digits. The ungrouped form (`4200,00`) is accepted as a whole token.
pub const CURRENCY: &str = r"\d{1,3}(?:\.\d{3})+,\d{2}|\d+,\d{2}";

lazy_static! {
    pub static ref CURRENCY_TOKEN: Regex = Regex::new(CURRENCY).unwrap();

    pub static ref CURRENCY_TOKEN_EXACT: Regex = Regex::new(
        &format!(r"^(?:{})$", CURRENCY)
    ).unwrap();

    // Start of the "debit value by tax ... activity" table
    pub static ref TRIBUTOS_ANCHOR: Regex = Regex::new(
        r"(?is)valor\s+do\s+d[ée]bito\s+por\s+tributo.*?atividade"
    ).unwrap();

    // Column header of the tax table in the first statement layout
    pub static ref TRIBUTOS_HEADER: Regex = Regex::new(
        r"(?i)IRPJ\s+CSLL\s+COFINS\s+PIS/Pasep\s+INSS/CPP\s+ICMS\s+IPI\s+ISS\s+Total\s*\n([\d.,\s]+)"
    ).unwrap();

    // Labeled fields
    pub static ref APURACAO_PERIOD: Regex = Regex::new(
        r"(?i)Per[ií]odo\s+de\s+Apura[çc][ãa]o:\s*(\d{2}/\d{2}/\d{4} a \d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref CNPJ_MATRIZ: Regex = Regex::new(
        r"(?i)CNPJ\s+Matriz:\s*(\d[\d./-]*)"
    ).unwrap();

    pub static ref COMPANY_NAME: Regex = Regex::new(
        r"(?i)Nome\s+empresarial:\s*([^\n]+)"
    ).unwrap();

    pub static ref PERIOD_GROSS_REVENUE: Regex = Regex::new(
        &format!(r"(?i)Receita\s+Bruta\s+do\s+PA.*?({})", CURRENCY)
    ).unwrap();

    pub static ref INFORMED_GROSS_REVENUE: Regex = Regex::new(
        &format!(r"(?i)Receita\s+Bruta\s+Informada:\s*R\$\s*({})", CURRENCY)
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_token_shapes() {
        let found: Vec<&str> = CURRENCY_TOKEN
            .find_iter("1.234,56 4200,00 12.345.678,90 0,00 7,5")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["1.234,56", "4200,00", "12.345.678,90", "0,00"]);
    }

    #[test]
    fn test_currency_token_exact() {
        assert!(CURRENCY_TOKEN_EXACT.is_match("1.234,56"));
        assert!(CURRENCY_TOKEN_EXACT.is_match("100,00"));
        assert!(!CURRENCY_TOKEN_EXACT.is_match("1.2"));
        assert!(!CURRENCY_TOKEN_EXACT.is_match("100,00x"));
    }

    #[test]
    fn test_anchor_is_case_insensitive() {
        assert!(TRIBUTOS_ANCHOR.is_match("VALOR DO DÉBITO POR TRIBUTO PARA A ATIVIDADE"));
        assert!(TRIBUTOS_ANCHOR.is_match("Valor do Débito por Tributo\npor Atividade"));
        assert!(!TRIBUTOS_ANCHOR.is_match("Atividade ... Valor do Débito por Tributo"));
    }
}
