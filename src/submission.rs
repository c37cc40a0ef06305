//! The submit-time gate.
//!
//! Validation is an ordered list of steps run by [`run_steps`], which stops at
//! the first failure. The order decides which message the user sees when
//! several things are wrong at once, so it is fixed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SubmissionError;
use crate::number::{count_typed_decimals, parse_number};
use crate::rules::ContestRules;
use crate::tokenize::tokenize;
use crate::weights::{first_overprecise, parse_tokens, validate_sign, MAX_TYPED_DECIMALS};

/// Slack on the fixed-income ceiling for float noise at the boundary.
pub const FIXED_INCOME_EPSILON: f64 = 1e-12;

/// Body of `POST /contests/{id}/submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub weights: Vec<f64>,
    pub fixed_income_weight: f64,
}

/// One submission attempt flowing through the steps.
pub struct Attempt<'a> {
    pub weights_text: &'a str,
    pub fixed_income_text: &'a str,
    pub rules: &'a ContestRules,
    pub participant_is_active: bool,
    fixed_income: f64,
    tokens: Vec<String>,
    weights: Vec<f64>,
}

impl<'a> Attempt<'a> {
    pub fn new(
        weights_text: &'a str,
        fixed_income_text: &'a str,
        rules: &'a ContestRules,
        participant_is_active: bool,
    ) -> Self {
        Self {
            weights_text,
            fixed_income_text,
            rules,
            participant_is_active,
            fixed_income: 0.0,
            tokens: Vec::new(),
            weights: Vec::new(),
        }
    }

    fn into_payload(self) -> SubmissionPayload {
        SubmissionPayload {
            weights: self.weights,
            fixed_income_weight: self.fixed_income,
        }
    }
}

pub type Step = fn(&mut Attempt<'_>) -> Result<(), SubmissionError>;

/// Validation steps in the order they are enforced.
pub const STEPS: &[(&str, Step)] = &[
    ("asset_count", check_asset_count),
    ("participant_active", check_participant),
    ("fixed_income_number", parse_fixed_income),
    ("fixed_income_precision", check_fixed_income_precision),
    ("fixed_income_sign", check_fixed_income_sign),
    ("fixed_income_max", check_fixed_income_max),
    ("weights_parse", parse_weights_step),
    ("weights_precision", check_weights_precision),
    ("weights_sign", check_weights_sign),
    ("sum_to_one", check_balance),
];

/// Run `steps` in order, stopping at the first error.
pub fn run_steps(attempt: &mut Attempt<'_>, steps: &[(&str, Step)]) -> Result<(), SubmissionError> {
    for (name, step) in steps {
        if let Err(err) = (*step)(&mut *attempt) {
            debug!(step = *name, kind = ?err.kind(), "submission rejected");
            return Err(err);
        }
    }
    Ok(())
}

/// Decide whether a submission may be sent, and build its payload if so.
///
/// Pure and idempotent; exactly one error is reported on failure.
pub fn validate_submission(
    weights_text: &str,
    fixed_income_text: &str,
    rules: &ContestRules,
    participant_is_active: bool,
) -> Result<SubmissionPayload, SubmissionError> {
    let mut attempt = Attempt::new(weights_text, fixed_income_text, rules, participant_is_active);
    run_steps(&mut attempt, STEPS)?;
    debug!(n_assets = rules.n_assets, "submission accepted");
    Ok(attempt.into_payload())
}

fn check_asset_count(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    if a.rules.n_assets == 0 {
        return Err(SubmissionError::MissingAssetCount);
    }
    Ok(())
}

fn check_participant(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    if !a.participant_is_active {
        return Err(SubmissionError::InactiveParticipant);
    }
    Ok(())
}

fn parse_fixed_income(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    a.fixed_income = parse_number(a.fixed_income_text).ok_or(SubmissionError::InvalidFixedIncome)?;
    Ok(())
}

fn check_fixed_income_precision(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    if count_typed_decimals(a.fixed_income_text) > MAX_TYPED_DECIMALS {
        return Err(SubmissionError::FixedIncomePrecision);
    }
    Ok(())
}

fn check_fixed_income_sign(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    if !a.rules.allow_short && a.fixed_income < 0.0 {
        return Err(SubmissionError::NegativeFixedIncome);
    }
    Ok(())
}

fn check_fixed_income_max(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    let max = a.rules.max_fixed_income_weight;
    if a.fixed_income > max + FIXED_INCOME_EPSILON {
        return Err(SubmissionError::FixedIncomeAboveMax { max });
    }
    Ok(())
}

fn parse_weights_step(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    a.tokens = tokenize(a.weights_text);
    a.weights = parse_tokens(&a.tokens, a.rules.n_assets)?;
    Ok(())
}

fn check_weights_precision(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    match first_overprecise(&a.tokens) {
        Some(position) => Err(SubmissionError::WeightPrecision { position }),
        None => Ok(()),
    }
}

fn check_weights_sign(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    validate_sign(&a.weights, a.rules.allow_short)
}

fn check_balance(a: &mut Attempt<'_>) -> Result<(), SubmissionError> {
    let total = a.weights.iter().sum::<f64>() + a.fixed_income;
    if (total - 1.0).abs() > a.rules.effective_sum_tol() {
        return Err(SubmissionError::Unbalanced { total });
    }
    Ok(())
}
