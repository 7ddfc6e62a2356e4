//! Accent, case and whitespace folding for keyword matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold text for phrase matching.
///
/// Lowercases, decomposes (NFD) and drops combining marks so `"Prestação"`
/// becomes `"prestacao"`, and collapses every whitespace run, newlines
/// included, into a single space.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;

    let folded = text
        .chars()
        .flat_map(char::to_lowercase)
        .nfd()
        .filter(|c| !is_combining_mark(*c));

    for c in folded {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }

    out
}
