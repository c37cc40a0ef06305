//! Live preview of a submission while it is being typed.
//!
//! Unlike [`crate::submission::validate_submission`], nothing here fails: each
//! field is computed on its own and degrades to `None` with a message when its
//! input is not usable yet.

use serde::Serialize;

use crate::error::SubmissionError;
use crate::number::{count_typed_decimals, parse_number};
use crate::rules::ContestRules;
use crate::submission::FIXED_INCOME_EPSILON;
use crate::tokenize::{is_blank, tokenize};
use crate::weights::{first_overprecise, parse_tokens, validate_sign, MAX_TYPED_DECIMALS};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewState {
    /// Number of tokens typed so far, valid or not.
    pub entered_count: usize,
    pub expected_count: usize,
    /// Sum of asset weights, only once every weight parses.
    pub sum_assets: Option<f64>,
    pub weights_ok: bool,
    pub weights_error: Option<String>,
    pub first_overprecise_position: Option<usize>,
    pub sign_ok: bool,

    pub fixed_income: Option<f64>,
    pub fixed_income_ok: bool,
    pub fixed_income_error: Option<String>,

    /// Assets plus fixed income, only when both sides are usable.
    pub total: Option<f64>,
    pub total_ok: bool,
    /// Everything above passes; the submit gate may still say otherwise.
    pub form_ok: bool,
}

impl PreviewState {
    /// Field-level messages in display order.
    pub fn field_errors(&self) -> Vec<&str> {
        [self.weights_error.as_deref(), self.fixed_income_error.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Project the current inputs into a preview. Linear in the number of tokens.
pub fn project(weights_text: &str, fixed_income_text: &str, rules: &ContestRules) -> PreviewState {
    let tokens = tokenize(weights_text);
    let parsed = parse_tokens(&tokens, rules.n_assets);

    let first_overprecise_position = first_overprecise(&tokens);
    let sign = match &parsed {
        Ok(weights) => validate_sign(weights, rules.allow_short),
        Err(_) => Ok(()),
    };

    let weights_error = match (&parsed, first_overprecise_position, &sign) {
        (Err(e), _, _) => Some(e.to_string()),
        (Ok(_), Some(position), _) => Some(SubmissionError::WeightPrecision { position }.to_string()),
        (Ok(_), None, Err(e)) => Some(e.to_string()),
        _ => None,
    };

    let sum_assets = parsed.as_ref().ok().map(|w| w.iter().sum::<f64>());

    let fixed_income = parse_number(fixed_income_text);
    let fixed_income_error = fixed_income_problem(fixed_income_text, fixed_income, rules);
    let fixed_income_ok = fixed_income_error.is_none();

    let total = match (sum_assets, fixed_income) {
        (Some(sum), Some(fi)) if fixed_income_ok => Some(sum + fi),
        _ => None,
    };
    let total_ok = total.is_some_and(|t| (t - 1.0).abs() <= rules.effective_sum_tol());

    let weights_ok = parsed.is_ok();
    let sign_ok = sign.is_ok();
    let form_ok = weights_ok && first_overprecise_position.is_none() && sign_ok && fixed_income_ok && total_ok;

    PreviewState {
        entered_count: tokens.len(),
        expected_count: rules.n_assets,
        sum_assets,
        weights_ok,
        weights_error,
        first_overprecise_position,
        sign_ok,
        fixed_income: if fixed_income_ok { fixed_income } else { None },
        fixed_income_ok,
        fixed_income_error: fixed_income_error.map(|e| e.to_string()),
        total,
        total_ok,
        form_ok,
    }
}

fn fixed_income_problem(text: &str, value: Option<f64>, rules: &ContestRules) -> Option<SubmissionError> {
    if text.chars().all(is_blank) {
        return Some(SubmissionError::EmptyFixedIncome);
    }
    let Some(fi) = value else {
        return Some(SubmissionError::InvalidFixedIncome);
    };
    if !rules.allow_short && fi < 0.0 {
        return Some(SubmissionError::NegativeFixedIncome);
    }
    if fi > rules.max_fixed_income_weight + FIXED_INCOME_EPSILON {
        return Some(SubmissionError::FixedIncomeAboveMax {
            max: rules.max_fixed_income_weight,
        });
    }
    if count_typed_decimals(text) > MAX_TYPED_DECIMALS {
        return Some(SubmissionError::FixedIncomePrecision);
    }
    None
}
