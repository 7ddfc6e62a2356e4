//! Rule-based field extractors for Simples Nacional statements.

pub mod anchor;
pub mod currency;
pub mod labeled;
pub mod normalize;
pub mod patterns;
pub mod regime;
pub mod revenue;
pub mod tributos;

pub use anchor::{locate_anchor, scan_window, window, REGIME_WINDOW_CHARS, TRIBUTOS_WINDOW_CHARS};
pub use currency::{first_currency_token, CurrencyTokenExtractor};
pub use labeled::{
    extract_apuracao_period, extract_company_name, extract_informed_gross_revenue,
    extract_matrix_tax_id, extract_period_gross_revenue, LabeledExtractor,
};
pub use normalize::normalize;
pub use regime::{classify_document, classify_regime, RegimeRule, REGIME_RULES};
pub use revenue::{extract_twelve_month_gross_revenue, TwelveMonthRevenueExtractor};
pub use tributos::{disambiguate, extract_tributos, extract_tributos_header_row};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched value and where it was found.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in source text.
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
