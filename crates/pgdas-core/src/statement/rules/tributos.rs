//! Debit-per-tax (tributos) block extraction.

use tracing::{debug, trace};

use super::anchor::{locate_anchor, scan_window, TRIBUTOS_WINDOW_CHARS};
use super::patterns::{CURRENCY_TOKEN_EXACT, TRIBUTOS_HEADER};
use crate::models::statement::Tributos;

/// Number of values in the block: eight taxes and the total.
const TRIBUTOS_COUNT: usize = 9;

/// Assign scanned tokens to the nine tax fields.
///
/// Some layouts repeat the informed gross revenue right before the table;
/// a first token equal to it is dropped. Fails unless nine tokens remain,
/// and any tokens past the ninth are ignored.
pub fn disambiguate<S: AsRef<str>>(
    tokens: &[S],
    informed_gross_revenue: Option<&str>,
) -> Option<Tributos> {
    if tokens.len() < TRIBUTOS_COUNT {
        debug!("Only {} tokens in tributos window", tokens.len());
        return None;
    }

    let tokens = match (tokens.first(), informed_gross_revenue) {
        (Some(first), Some(informed)) if first.as_ref() == informed => {
            debug!("Dropping leading informed revenue {}", informed);
            &tokens[1..]
        }
        _ => tokens,
    };

    if tokens.len() < TRIBUTOS_COUNT {
        debug!("Only {} tokens left after dropping duplicate", tokens.len());
        return None;
    }

    let values: [String; TRIBUTOS_COUNT] = std::array::from_fn(|i| tokens[i].as_ref().to_string());
    Some(Tributos::from_values(values))
}

/// Read the block from the window after the tax-table title.
pub fn extract_tributos(text: &str, informed_gross_revenue: Option<&str>) -> Option<Tributos> {
    let anchor = locate_anchor(text)?;
    let tokens = scan_window(text, anchor, TRIBUTOS_WINDOW_CHARS);
    disambiguate(&tokens, informed_gross_revenue)
}

/// Read the block from the numbers under the `IRPJ CSLL ... Total` header.
///
/// Used by the first statement layout. The first nine whitespace-separated
/// values must all be currency tokens.
pub fn extract_tributos_header_row(text: &str) -> Option<Tributos> {
    let caps = TRIBUTOS_HEADER.captures(text)?;
    let values: Vec<&str> = caps.get(1)?.as_str().split_whitespace().collect();
    trace!("Header row values: {:?}", values);

    if values.len() < TRIBUTOS_COUNT {
        debug!("Only {} values under tributos header", values.len());
        return None;
    }

    let values = &values[..TRIBUTOS_COUNT];
    if !values.iter().all(|v| CURRENCY_TOKEN_EXACT.is_match(v)) {
        debug!("Malformed value under tributos header");
        return None;
    }

    let values: [String; TRIBUTOS_COUNT] = std::array::from_fn(|i| values[i].to_string());
    Some(Tributos::from_values(values))
}
