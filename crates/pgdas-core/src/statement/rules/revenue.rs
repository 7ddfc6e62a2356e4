//! Twelve-month gross revenue (RBT12) extraction.
//!
//! Statements print several "twelve months" labels in different sections.
//! The RBT12 figure is the one whose label is split over two lines and whose
//! value sits on the line after that:
//!
//! ```text
//! Receita bruta acumulada nos doze meses anteriores     <- LABEL
//! ao PA (RBT12)                                         <- LABEL + 1
//! 180.000,00 ...                                        <- LABEL + 2
//! ```
//!
//! Any other segmentation is reported as not found.

use tracing::debug;

use super::currency::first_currency_token;
use super::normalize::normalize;
use super::{ExtractionMatch, FieldExtractor};

const LABEL_PHRASE: &str = "receita bruta acumulada nos doze meses anteriores";
const SUFFIX_PHRASE: &str = "ao pa (rbt12)";

/// Line holding the suffix, relative to the label line.
const SUFFIX_OFFSET: usize = 1;
/// Line holding the value, relative to the label line.
const VALUE_OFFSET: usize = 2;

/// Line-relative RBT12 extractor.
pub struct TwelveMonthRevenueExtractor;

impl TwelveMonthRevenueExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TwelveMonthRevenueExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TwelveMonthRevenueExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// At most one match: only the first label line is evaluated.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lines: Vec<&str> = text.lines().collect();

        let Some(label_index) = lines
            .iter()
            .position(|line| normalize(line).contains(LABEL_PHRASE))
        else {
            return Vec::new();
        };

        let suffix_found = lines
            .get(label_index + SUFFIX_OFFSET)
            .is_some_and(|line| normalize(line).contains(SUFFIX_PHRASE));
        if !suffix_found {
            debug!("RBT12 label at line {} not followed by suffix", label_index);
            return Vec::new();
        }

        let Some(value_line) = lines.get(label_index + VALUE_OFFSET) else {
            debug!("RBT12 label at line {} has no value line", label_index);
            return Vec::new();
        };

        match first_currency_token(value_line) {
            Some(value) => vec![ExtractionMatch::new(value)],
            None => {
                debug!("No currency token on RBT12 value line {}", label_index + VALUE_OFFSET);
                Vec::new()
            }
        }
    }
}

/// RBT12 value, or `None` when the three-line layout is not found.
pub fn extract_twelve_month_gross_revenue(text: &str) -> Option<String> {
    TwelveMonthRevenueExtractor::new().extract(text).map(|m| m.value)
}
