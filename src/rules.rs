//! Contest rules as the validator sees them.
//!
//! The backend's contest document is loose JSON; fields drift between a
//! `rules` block, a `limits` block and the root. `ContestRules::from_contest`
//! coerces it into one typed record with the client-side defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tolerance used when the contest does not specify `sum_tol`, and the floor
/// applied to any specified value.
pub const DEFAULT_SUM_TOL: f64 = 1e-6;
/// Fixed-income ceiling used when the contest does not specify one.
pub const DEFAULT_MAX_FIXED_INCOME: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestRules {
    pub n_assets: usize,
    #[serde(default)]
    pub allow_short: bool,
    #[serde(default = "default_sum_tol")]
    pub sum_tol: f64,
    #[serde(default = "default_max_fixed_income")]
    pub max_fixed_income_weight: f64,
}

fn default_sum_tol() -> f64 {
    DEFAULT_SUM_TOL
}

fn default_max_fixed_income() -> f64 {
    DEFAULT_MAX_FIXED_INCOME
}

impl Default for ContestRules {
    fn default() -> Self {
        Self {
            n_assets: 0,
            allow_short: false,
            sum_tol: DEFAULT_SUM_TOL,
            max_fixed_income_weight: DEFAULT_MAX_FIXED_INCOME,
        }
    }
}

impl ContestRules {
    pub fn new(n_assets: usize, allow_short: bool) -> Self {
        Self {
            n_assets,
            allow_short,
            ..Self::default()
        }
    }

    pub fn with_sum_tol(mut self, sum_tol: f64) -> Self {
        self.sum_tol = sum_tol;
        self
    }

    pub fn with_max_fixed_income(mut self, max: f64) -> Self {
        self.max_fixed_income_weight = max;
        self
    }

    /// Tolerance actually applied to the sum-to-one check.
    pub fn effective_sum_tol(&self) -> f64 {
        if self.sum_tol.is_finite() && self.sum_tol >= 0.0 {
            self.sum_tol.max(DEFAULT_SUM_TOL)
        } else {
            DEFAULT_SUM_TOL
        }
    }

    /// Build rules from a contest document as returned by the API.
    pub fn from_contest(contest: &Value) -> Self {
        let rules = &contest["rules"];

        let n_assets = as_number(&rules["n_assets"])
            .filter(|n| *n > 0.0)
            .map(|n| n as usize)
            .unwrap_or(0);

        let allow_short = coerce_boolish(&rules["allow_short"], false);

        let sum_tol = as_number(&rules["sum_tol"])
            .filter(|v| *v >= 0.0)
            .unwrap_or(DEFAULT_SUM_TOL);

        let max_fixed_income_weight = as_number(&contest["max_fixed_income_weight"])
            .filter(|v| *v >= 0.0)
            .or_else(|| as_number(&contest["limits"]["max_fixed_income_weight"]).filter(|v| *v >= 0.0))
            .unwrap_or(DEFAULT_MAX_FIXED_INCOME);

        Self {
            n_assets,
            allow_short,
            sum_tol,
            max_fixed_income_weight,
        }
    }
}

/// Whether the participant record marks the caller as active.
pub fn participant_is_active(participant: &Value) -> bool {
    participant["status"]
        .as_str()
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("active"))
}

/// Finite number from a JSON number or a numeric string.
pub(crate) fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Lenient boolean: accepts bools, non-zero numbers and yes/no style strings.
pub fn coerce_boolish(v: &Value, fallback: bool) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => true,
            "false" | "0" | "no" | "n" | "" => false,
            _ => fallback,
        },
        _ => fallback,
    }
}
