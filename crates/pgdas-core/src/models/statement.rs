//! Statement data models for Simples Nacional (PGDAS-D) extracts.

use std::fmt;

use serde::{Serialize, Serializer};

/// Label emitted in place of any field whose source pattern did not match.
pub const NOT_FOUND: &str = "Não encontrado";

/// Plain text of a statement as handed to the extraction engine.
///
/// Line endings are collapsed to `\n` and the text is trimmed at both ends.
/// Construction is idempotent, so already-normalized text passes through
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentText(String);

impl DocumentText {
    /// Normalize raw extracted text into document text.
    pub fn new(raw: &str) -> Self {
        let text = raw.replace("\r\n", "\n").replace('\r', "\n");
        Self(text.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for DocumentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single extracted value, or the not-found sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T = String> {
    /// The value matched its expected shape.
    Found(T),
    /// The source pattern did not match.
    NotFound,
}

impl<T> Field<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Field::Found(_))
    }
}

impl Field<String> {
    /// The found text, or the [`NOT_FOUND`] label.
    pub fn as_str(&self) -> &str {
        match self {
            Field::Found(v) => v,
            Field::NotFound => NOT_FOUND,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::NotFound
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Found(v),
            None => Field::NotFound,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Found(v) => v.fmt(f),
            Field::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Found(v) => v.serialize(serializer),
            Field::NotFound => serializer.serialize_str(NOT_FOUND),
        }
    }
}

/// Simples Nacional tax regime (annex) the statement's activity falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaxRegime {
    /// Commerce (revenda de mercadorias).
    #[serde(rename = "Anexo I")]
    AnexoI,
    /// Industry.
    #[serde(rename = "Anexo II")]
    AnexoII,
    /// Services without the "fator r".
    #[serde(rename = "Anexo III")]
    AnexoIII,
    /// Services subject to annex IV.
    #[serde(rename = "Anexo IV")]
    AnexoIV,
}

impl TaxRegime {
    pub fn label(&self) -> &'static str {
        match self {
            TaxRegime::AnexoI => "Anexo I",
            TaxRegime::AnexoII => "Anexo II",
            TaxRegime::AnexoIII => "Anexo III",
            TaxRegime::AnexoIV => "Anexo IV",
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Debit values per tax, in table order.
///
/// Either every field is found or none is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tributos {
    pub irpj: Field,
    pub csll: Field,
    pub cofins: Field,
    pub pis_pasep: Field,
    pub inss_cpp: Field,
    pub icms: Field,
    pub ipi: Field,
    pub iss: Field,
    pub total: Field,
}

impl Tributos {
    /// Field names in table order.
    pub const NAMES: [&'static str; 9] = [
        "irpj", "csll", "cofins", "pis_pasep", "inss_cpp", "icms", "ipi", "iss", "total",
    ];

    /// The all-sentinel block.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Assign nine values in table order.
    pub fn from_values(values: [String; 9]) -> Self {
        let [irpj, csll, cofins, pis_pasep, inss_cpp, icms, ipi, iss, total] =
            values.map(Field::Found);
        Self {
            irpj,
            csll,
            cofins,
            pis_pasep,
            inss_cpp,
            icms,
            ipi,
            iss,
            total,
        }
    }

    pub fn is_populated(&self) -> bool {
        self.fields().iter().all(|(_, f)| f.is_found())
    }

    /// (name, value) pairs in table order.
    pub fn fields(&self) -> [(&'static str, &Field); 9] {
        [
            ("irpj", &self.irpj),
            ("csll", &self.csll),
            ("cofins", &self.cofins),
            ("pis_pasep", &self.pis_pasep),
            ("inss_cpp", &self.inss_cpp),
            ("icms", &self.icms),
            ("ipi", &self.ipi),
            ("iss", &self.iss),
            ("total", &self.total),
        ]
    }
}

/// Structured fields extracted from one statement.
///
/// Every key is always serialized; absent data is the [`NOT_FOUND`] label.
/// Currency values are kept as the matched text (`1.234,56`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Assessment period, `DD/MM/YYYY a DD/MM/YYYY`.
    pub apuracao_period: Field,

    /// Head-office CNPJ.
    pub matrix_tax_id: Field,

    /// Registered company name.
    pub company_name: Field,

    /// Gross revenue of the assessment period (PA).
    pub period_gross_revenue: Field,

    /// Gross revenue accumulated over the twelve months before the PA (RBT12).
    pub twelve_month_gross_revenue: Field,

    /// Gross revenue informed by the taxpayer.
    pub informed_gross_revenue: Field,

    /// Annex the activity is taxed under.
    pub tax_regime: Field<TaxRegime>,

    /// Debit values per tax.
    pub tributos: Tributos,
}

impl ExtractionResult {
    /// Names of the fields that fell back to the sentinel.
    ///
    /// The tributos block is reported once, as `"tributos"`.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let scalars: [(&'static str, bool); 7] = [
            ("apuracao_period", self.apuracao_period.is_found()),
            ("matrix_tax_id", self.matrix_tax_id.is_found()),
            ("company_name", self.company_name.is_found()),
            ("period_gross_revenue", self.period_gross_revenue.is_found()),
            ("twelve_month_gross_revenue", self.twelve_month_gross_revenue.is_found()),
            ("informed_gross_revenue", self.informed_gross_revenue.is_found()),
            ("tax_regime", self.tax_regime.is_found()),
        ];
        for (name, found) in scalars {
            if !found {
                missing.push(name);
            }
        }
        if !self.tributos.is_populated() {
            missing.push("tributos");
        }
        missing
    }
}
