//! Strict numeric parsing for typed weights.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tokenize::is_blank;

/// Returned by [`count_typed_decimals`] when the token has no valid numeric shape.
pub const INVALID_DECIMALS: usize = 999;

static PLAIN_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?([0-9]+)(?:\.([0-9]+))?$").expect("number pattern is valid"));

fn clean(token: &str) -> String {
    token.chars().filter(|c| !is_blank(*c)).collect()
}

fn has_exponent(token: &str) -> bool {
    token.contains(['e', 'E'])
}

/// Parse a single token as a plain dot-decimal number.
///
/// Whitespace anywhere in the token is ignored. Commas, exponents and
/// anything outside `[+-]digits[.digits]` yield `None`.
pub fn parse_number(token: &str) -> Option<f64> {
    let t = clean(token);
    if t.is_empty() || t.contains(',') || has_exponent(&t) || !PLAIN_NUMBER.is_match(&t) {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Count the decimal digits exactly as typed, without going through `f64`.
///
/// `"0.200"` is 3 and `"10"` is 0. Tokens that are not plain numbers return
/// [`INVALID_DECIMALS`]. An empty token counts as 0.
pub fn count_typed_decimals(token: &str) -> usize {
    let t = clean(token);
    if t.is_empty() {
        return 0;
    }
    if t.contains(',') || has_exponent(&t) {
        return INVALID_DECIMALS;
    }
    match PLAIN_NUMBER.captures(&t) {
        Some(caps) => caps.get(2).map_or(0, |m| m.as_str().len()),
        None => INVALID_DECIMALS,
    }
}

/// Round half away from zero to `decimals` places. Non-finite input passes through.
pub fn round_to(n: f64, decimals: u32) -> f64 {
    if !n.is_finite() {
        return n;
    }
    let p = 10f64.powi(decimals as i32);
    (n * p).round() / p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_number("0.25"), Some(0.25));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("+0.5"), Some(0.5));
        assert_eq!(parse_number(" - 0.8 "), Some(-0.8));
    }

    #[test]
    fn rejects_ambiguous_formats() {
        assert_eq!(parse_number("0,2"), None);
        assert_eq!(parse_number("1e-3"), None);
        assert_eq!(parse_number("1E3"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number(".5"), None);
        assert_eq!(parse_number("5."), None);
        assert_eq!(parse_number("--1"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn ignores_byte_order_mark() {
        assert_eq!(parse_number("\u{feff}0.25"), Some(0.25));
        assert_eq!(count_typed_decimals("\u{feff}0.250"), 3);
    }

    #[test]
    fn rejects_non_ascii_digits() {
        assert_eq!(parse_number("\u{0663}"), None);
        assert_eq!(parse_number("0.\u{0665}"), None);
        assert_eq!(count_typed_decimals("0.\u{0665}"), INVALID_DECIMALS);
    }

    #[test]
    fn counts_decimals_as_typed() {
        assert_eq!(count_typed_decimals("0.200"), 3);
        assert_eq!(count_typed_decimals("0.2"), 1);
        assert_eq!(count_typed_decimals("10"), 0);
        assert_eq!(count_typed_decimals("-0.1234"), 4);
        assert_eq!(count_typed_decimals(""), 0);
    }

    #[test]
    fn invalid_shapes_hit_sentinel() {
        assert_eq!(count_typed_decimals("1,2"), INVALID_DECIMALS);
        assert_eq!(count_typed_decimals("1e3"), INVALID_DECIMALS);
        assert_eq!(count_typed_decimals("abc"), INVALID_DECIMALS);
    }

    #[test]
    fn rounds_to_places() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert!(round_to(f64::NAN, 2).is_nan());
    }
}
