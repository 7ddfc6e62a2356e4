//! Anchor location and windowed token scanning.
//!
//! The debit-per-tax table has no fixed position in the extracted text, so
//! it is found through its title ("Valor do Débito por Tributo ... Atividade")
//! and read from a bounded window starting at that title. Windows are
//! measured in characters. Tokens past the end of a window are lost; a table
//! longer than the window yields fewer tokens rather than an error.

use tracing::{debug, trace};

use super::patterns::TRIBUTOS_ANCHOR;
use super::{CurrencyTokenExtractor, FieldExtractor};

/// Window read for the tax table body.
pub const TRIBUTOS_WINDOW_CHARS: usize = 2000;

/// Window read for regime classification; the descriptive activity text
/// runs further than the numeric table.
pub const REGIME_WINDOW_CHARS: usize = 5000;

/// Byte offset of the first tax-table title in `text`.
pub fn locate_anchor(text: &str) -> Option<usize> {
    let offset = TRIBUTOS_ANCHOR.find(text).map(|m| m.start());
    debug!("Tributos anchor: {:?}", offset);
    offset
}

/// Up to `chars` characters of `text` starting at byte `offset`.
///
/// An offset that is out of range or not on a character boundary yields an
/// empty window.
pub fn window(text: &str, offset: usize, chars: usize) -> &str {
    let tail = text.get(offset..).unwrap_or("");
    let end = tail
        .char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(tail.len());
    &tail[..end]
}

/// Currency tokens inside the window at `offset`, in document order.
pub fn scan_window(text: &str, offset: usize, chars: usize) -> Vec<String> {
    let tokens: Vec<String> = CurrencyTokenExtractor::new()
        .extract_all(window(text, offset, chars))
        .into_iter()
        .map(|m| m.value)
        .collect();
    trace!("Window tokens at {}: {:?}", offset, tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_occurrence() {
        let text = "cabecalho\nValor do Débito por Tributo para a Atividade\n1,00\n\
                    Valor do Débito por Tributo para a Atividade\n2,00";
        assert_eq!(locate_anchor(text), Some(10));
    }

    #[test]
    fn test_locate_missing() {
        assert_eq!(locate_anchor("Valor do Débito por Tributo sem o restante"), None);
        assert_eq!(locate_anchor(""), None);
    }

    #[test]
    fn test_window_counts_characters() {
        let text = "ãããabc";
        assert_eq!(window(text, 0, 4), "ãããa");
        assert_eq!(window(text, 2, 2), "ãã");
        assert_eq!(window(text, 0, 100), text);
        assert_eq!(window(text, 1, 3), "");
        assert_eq!(window(text, 999, 3), "");
    }

    #[test]
    fn test_scan_window_truncates() {
        let text = "100,00 200,00 300,00";
        assert_eq!(scan_window(text, 0, 13), vec!["100,00", "200,00"]);
        // "200,0" is cut mid-token and no longer matches
        assert_eq!(scan_window(text, 0, 12), vec!["100,00"]);
    }
}
