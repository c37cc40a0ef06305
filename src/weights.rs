use crate::error::SubmissionError;
use crate::number::{count_typed_decimals, parse_number};
use crate::tokenize::tokenize;

/// Maximum decimal digits a user may type on any weight.
pub const MAX_TYPED_DECIMALS: usize = 3;

/// Parse pasted weights into exactly `n_assets` numbers, in the order typed.
pub fn parse_weights(text: &str, n_assets: usize) -> Result<Vec<f64>, SubmissionError> {
    let tokens = tokenize(text);
    parse_tokens(&tokens, n_assets)
}

pub(crate) fn parse_tokens(tokens: &[String], n_assets: usize) -> Result<Vec<f64>, SubmissionError> {
    if tokens.is_empty() {
        return Err(SubmissionError::EmptyWeights);
    }
    if n_assets == 0 {
        return Err(SubmissionError::MissingAssetCount);
    }
    if tokens.len() != n_assets {
        return Err(SubmissionError::WrongCount {
            expected: n_assets,
            received: tokens.len(),
        });
    }

    tokens
        .iter()
        .enumerate()
        .map(|(i, tok)| parse_number(tok).ok_or(SubmissionError::InvalidWeight { position: i + 1 }))
        .collect()
}

/// 1-based position of the first token typed with too many decimals.
pub fn first_overprecise(tokens: &[String]) -> Option<usize> {
    tokens
        .iter()
        .position(|t| count_typed_decimals(t) > MAX_TYPED_DECIMALS)
        .map(|i| i + 1)
}

/// Reject the first negative weight unless the contest allows shorting.
pub fn validate_sign(weights: &[f64], allow_short: bool) -> Result<(), SubmissionError> {
    if allow_short {
        return Ok(());
    }
    match weights.iter().position(|w| *w < 0.0) {
        Some(i) => Err(SubmissionError::NegativeWeight { position: i + 1 }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_count() {
        let w = parse_weights("0.3,0.3,0.4", 3).expect("weights should parse");
        assert_eq!(w, vec![0.3, 0.3, 0.4]);
    }

    #[test]
    fn count_mismatch_names_both_sides() {
        let err = parse_weights("0.2, 0.2", 3).expect_err("must fail");
        assert_eq!(err.to_string(), "Expected 3 weights, got 2.");
    }

    #[test]
    fn empty_text_wins_over_missing_rules() {
        assert_eq!(parse_weights("  ", 0), Err(SubmissionError::EmptyWeights));
        assert_eq!(parse_weights("0.5", 0), Err(SubmissionError::MissingAssetCount));
    }

    #[test]
    fn reports_first_bad_position() {
        let err = parse_weights("0.5 0,2 1e-3", 3).expect_err("must fail");
        assert_eq!(err, SubmissionError::InvalidWeight { position: 2 });
        assert_eq!(err.to_string(), "Invalid number at position 2. Use \".\" for decimals.");
    }

    #[test]
    fn keeps_split_signs_together() {
        let w = parse_weights("- 0.2 0.6 0.6", 3).expect("weights should parse");
        assert_eq!(w, vec![-0.2, 0.6, 0.6]);
    }

    #[test]
    fn finds_overprecise_token() {
        let tokens = tokenize("0.25 0.2500 0.5");
        assert_eq!(first_overprecise(&tokens), Some(2));
        assert_eq!(first_overprecise(&tokenize("0.250 0.750")), None);
    }

    #[test]
    fn sign_rule_names_first_negative() {
        let err = validate_sign(&[-0.1, 0.5, 0.6], false).expect_err("must fail");
        assert_eq!(err, SubmissionError::NegativeWeight { position: 1 });
        assert_eq!(err.to_string(), "Weight 1 must be ≥ 0.");
        assert!(validate_sign(&[-0.1, 0.5, 0.6], true).is_ok());
        assert_eq!(
            validate_sign(&[0.1, -0.5, -0.6], false),
            Err(SubmissionError::NegativeWeight { position: 2 })
        );
    }
}
