//! Rule-aware contest briefing, built from the contest document.

use serde::Serialize;
use serde_json::Value;

use crate::metrics::primary_metric_label;
use crate::rules::{as_number, coerce_boolish, ContestRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Blue,
    Green,
    Amber,
    Gray,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chip {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Briefing {
    pub at_a_glance: Vec<Chip>,
    pub objective: Vec<String>,
    pub rules: Vec<String>,
    pub limits: Vec<String>,
    pub fixed_income: Vec<String>,
}

fn chip(label: &str, value: impl Into<String>, tone: Tone) -> Chip {
    Chip {
        label: label.to_string(),
        value: value.into(),
        tone,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

/// Text without surrounding quotes for strings, JSON otherwise.
fn plain(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn build_briefing(contest: &Value) -> Briefing {
    let rules = &contest["rules"];
    let limits = &contest["limits"];
    let ranking = &contest["ranking"];

    let n_assets = ContestRules::from_contest(contest).n_assets;
    let allow_short = coerce_boolish(&rules["allow_short"], false);
    let sum_min = as_number(&rules["sum_min"]).unwrap_or(0.0);
    let sum_max = as_number(&rules["sum_max"]).unwrap_or(1.0);
    let max_leverage = as_number(&rules["max_leverage"]).unwrap_or(1.0);
    let max_positions = as_number(&rules["max_positions"]).unwrap_or(n_assets as f64);

    let primary = ranking["primary_metric"].as_str().unwrap_or_default();
    let better = if ranking["order"].as_str() == Some("asc") {
        "Lower is better"
    } else {
        "Higher is better"
    };

    let fi_annual = as_number(&contest["fixed_income_annual_return_pct"]);
    let max_daily = limits["max_daily_submissions"].as_f64();
    let max_total = limits["max_total_submissions"].as_f64();
    let max_fi = as_number(&contest["max_fixed_income_weight"]);

    let mut b = Briefing::default();

    let metric = if primary.is_empty() {
        "—".to_string()
    } else {
        format!("{} • {}", primary_metric_label(primary), better)
    };
    b.at_a_glance.push(chip("Metric", metric, Tone::Blue));
    let assets = if n_assets > 0 { n_assets.to_string() } else { "—".to_string() };
    b.at_a_glance.push(chip("Assets", assets, Tone::Gray));
    if allow_short {
        b.at_a_glance.push(chip("Style", "Long/Short allowed", Tone::Amber));
    } else {
        b.at_a_glance.push(chip("Style", "Long-only", Tone::Green));
    }
    if let Some(d) = max_daily {
        b.at_a_glance.push(chip("Daily limit", d.to_string(), Tone::Gray));
    }
    if let Some(t) = max_total {
        b.at_a_glance.push(chip("Total limit", t.to_string(), Tone::Gray));
    }
    if let Some(r) = fi_annual {
        b.at_a_glance.push(chip("Fixed income", format!("{r:.2}% / year"), Tone::Blue));
    }

    b.objective.push(if primary.is_empty() {
        "Your score is based on the contest metric.".to_string()
    } else {
        format!("Your score is based on {}.", primary_metric_label(primary))
    });
    b.objective
        .push("You submit portfolio weights; the system evaluates on unseen future returns.".to_string());

    let n_label = if n_assets > 0 { n_assets.to_string() } else { "N".to_string() };
    b.rules.push(format!("Provide {n_label} risky-asset weights."));
    b.rules.push(if allow_short {
        "Short positions are allowed (negative weights).".to_string()
    } else {
        "All risky-asset weights must be ≥ 0.".to_string()
    });
    if max_leverage > 1.0 {
        b.rules
            .push(format!("Leverage: sum(|risky weights|) + fixed income ≤ {max_leverage}."));
    } else {
        b.rules
            .push("Risky-asset weights plus the fixed-income weight must equal 1.".to_string());
    }

    let default_alloc = approx(sum_min, 0.0) && approx(sum_max, 1.0);
    let fixed_alloc = approx(sum_min, 1.0) && approx(sum_max, 1.0);
    if !(default_alloc || fixed_alloc) {
        b.rules
            .push(format!("Total allocation must be between {sum_min} and {sum_max}."));
    }
    if n_assets > 0 && max_positions.round() as usize != n_assets {
        b.rules.push(format!(
            "Max positions: at most {} non-zero risky-asset weights.",
            max_positions.round()
        ));
    }

    if !contest["start_date"].is_null() {
        b.limits.push(format!("Start: {}", plain(&contest["start_date"])));
    }
    if !contest["end_date"].is_null() {
        b.limits.push(format!("End: {}", plain(&contest["end_date"])));
    }
    if let Some(d) = max_daily {
        b.limits.push(format!("Max submissions per day: {d}"));
    }
    if let Some(t) = max_total {
        b.limits.push(format!("Max submissions total: {t}"));
    }

    if let Some(r) = fi_annual {
        b.fixed_income
            .push(format!("Fixed income annual return: {r:.2}%"));
    }
    if let Some(m) = max_fi {
        b.fixed_income.push(format!("Max fixed income weight: {m}"));
    }
    b.fixed_income.push(
        "If your contest uses fixed income, include it in the total weight you submit.".to_string(),
    );

    b
}
