//! Display labels and formatting for backend score metrics.

use serde_json::Value;

use crate::rules::as_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFormat {
    Percent,
    Ratio,
    Number,
    Integer,
    Days,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub fmt: MetricFormat,
    pub decimals: usize,
    /// Value arrives as a fraction (0.12) and is shown as a percent (12%).
    pub percent_from_unit_interval: bool,
}

const fn meta(key: &'static str, label: &'static str, fmt: MetricFormat, decimals: usize, unit: bool) -> MetricMeta {
    MetricMeta {
        key,
        label,
        fmt,
        decimals,
        percent_from_unit_interval: unit,
    }
}

pub const METRICS: &[MetricMeta] = &[
    meta("annual_return", "Annual return", MetricFormat::Percent, 2, true),
    meta("annual_vol", "Annual volatility", MetricFormat::Percent, 2, true),
    meta("var", "VaR (5%)", MetricFormat::Percent, 2, true),
    meta("cvar", "CVaR (5%)", MetricFormat::Percent, 2, true),
    meta("max_drawdown", "Max drawdown", MetricFormat::Percent, 2, true),
    meta("sharpe", "Sharpe ratio", MetricFormat::Ratio, 2, false),
    meta("sortino", "Sortino ratio", MetricFormat::Ratio, 2, false),
    meta("calmar", "Calmar ratio", MetricFormat::Ratio, 2, false),
    meta("time_under_water", "Time under water", MetricFormat::Days, 0, false),
    meta("n_obs", "Observations", MetricFormat::Integer, 0, false),
    meta("freq", "Frequency (days/year)", MetricFormat::Integer, 0, false),
    meta("alpha", "Alpha", MetricFormat::Percent, 1, true),
    meta("kurtosis", "Kurtosis", MetricFormat::Number, 2, false),
];

pub fn metric_meta(key: &str) -> Option<&'static MetricMeta> {
    METRICS.iter().find(|m| m.key == key)
}

/// `"max_drawdown"` -> `"Max Drawdown"`.
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn primary_metric_label(primary: &str) -> String {
    metric_meta(primary).map_or_else(|| humanize_key(primary), |m| m.label.to_string())
}

/// Render `"{label}: {value}"` using the metric's known format.
pub fn format_metric_value(key: &str, value: &Value) -> String {
    if value.is_null() {
        return "—".to_string();
    }
    let Some(n) = as_number(value) else {
        return match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    };

    let Some(meta) = metric_meta(key) else {
        return format!("{}: {}", humanize_key(key), n);
    };

    let d = meta.decimals;
    match meta.fmt {
        MetricFormat::Percent => {
            let v = if meta.percent_from_unit_interval { n * 100.0 } else { n };
            format!("{}: {:.*}%", meta.label, d, v)
        }
        MetricFormat::Ratio | MetricFormat::Number => format!("{}: {:.*}", meta.label, d, n),
        MetricFormat::Days => format!("{}: {} days", meta.label, n.round()),
        MetricFormat::Integer => format!("{}: {}", meta.label, n.round()),
    }
}

/// First value that is a finite number, in order.
pub fn pick_first_number<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<f64> {
    values.into_iter().find_map(as_number)
}
