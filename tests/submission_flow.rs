use serde_json::json;

use weights_preflight::{
    count_typed_decimals, parse_number, parse_weights, project, tokenize, validate_sign,
    validate_submission, ContestRules, ErrorKind, SubmissionError,
};

fn contest_rules() -> ContestRules {
    ContestRules::from_contest(&json!({
        "rules": { "n_assets": 3, "allow_short": false, "sum_tol": 1e-6 },
        "max_fixed_income_weight": 1
    }))
}

#[test]
fn building_blocks_agree_on_examples() {
    assert_eq!(tokenize("- 0.8 0.2"), tokenize("-0.8 0.2"));
    assert_eq!(parse_number("0,2"), None);
    assert_eq!(parse_number("1e-3"), None);
    assert_eq!(parse_number("0.25"), Some(0.25));
    assert_eq!(count_typed_decimals("0.200"), 3);
    assert_eq!(count_typed_decimals("1,2"), 999);
    assert_eq!(parse_weights("0.3,0.3,0.4", 3), Ok(vec![0.3, 0.3, 0.4]));
    assert!(validate_sign(&[-0.1, 0.5, 0.6], true).is_ok());
}

#[test]
fn accepted_submission_produces_wire_payload() {
    let payload = validate_submission("0.4\n0.4\n0.2", "0.0", &contest_rules(), true)
        .expect("submission should pass");
    let body = serde_json::to_value(&payload).expect("payload serializes");
    assert_eq!(body, json!({ "weights": [0.4, 0.4, 0.2], "fixed_income_weight": 0.0 }));
}

#[test]
fn preview_and_gate_agree_on_valid_input() {
    let rules = contest_rules();
    let preview = project("0.3; 0.3; 0.2", "0.2", &rules);
    assert!(preview.form_ok);
    assert!(validate_submission("0.3; 0.3; 0.2", "0.2", &rules, true).is_ok());
}

#[test]
fn preview_and_gate_agree_on_imbalance() {
    let rules = contest_rules();
    let preview = project("0.5 0.5 0.2", "0.0", &rules);
    assert!(!preview.total_ok);

    let err = validate_submission("0.5 0.5 0.2", "0.0", &rules, true).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::Balance);
    assert_eq!(
        err.to_string(),
        "Weights must sum to 1 (including fixed income). Current sum = 1.200000."
    );
}

#[test]
fn only_first_problem_is_reported() {
    let rules = contest_rules();
    // inactive, bad fixed income, wrong count and negative weight all at once
    let err = validate_submission("-0.5 2", "1,5", &rules, false).expect_err("must fail");
    assert_eq!(err, SubmissionError::InactiveParticipant);

    let err = validate_submission("-0.5 2", "1,5", &rules, true).expect_err("must fail");
    assert_eq!(err, SubmissionError::InvalidFixedIncome);

    let err = validate_submission("-0.5 2", "0", &rules, true).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn preview_keeps_going_when_gate_would_stop() {
    let rules = contest_rules();
    let preview = project("-0.5 2", "1,5", &rules);
    assert_eq!(preview.entered_count, 2);
    assert_eq!(preview.field_errors().len(), 2);
    assert_eq!(preview.total, None);
}
