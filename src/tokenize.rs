//! Splitting pasted weights text into numeric tokens.
//!
//! Commas are separators here, never decimal marks. A sign typed apart from
//! its number ("- 0.8") is folded back into one token so that the parser and
//! the precision counter see the same thing the user meant.

use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,;\x{FEFF}]+").expect("separator pattern is valid"));

static UNSIGNED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("unsigned number pattern is valid"));

/// Whitespace as the browser sees it: Unicode spaces plus the byte-order mark
/// that spreadsheet exports put at the start of a file.
pub(crate) fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Split free-form text on whitespace, commas and semicolons.
///
/// A lone `-` or `+` followed by a plain unsigned number is merged with it.
/// Order is preserved and empty tokens are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let raw: Vec<&str> = SEPARATORS
        .split(text.trim_matches(is_blank))
        .filter(|t| !t.is_empty())
        .collect();

    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let tok = raw[i];
        if (tok == "-" || tok == "+") && i + 1 < raw.len() && UNSIGNED_NUMBER.is_match(raw[i + 1]) {
            out.push(format!("{tok}{}", raw[i + 1]));
            i += 2;
            continue;
        }
        out.push(tok.to_string());
        i += 1;
    }
    out
}
