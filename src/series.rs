//! Series shaping for charts: equity curves and submission progress.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::as_number;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub t: usize,
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub t: usize,
    pub score: Option<f64>,
    pub rank: Option<f64>,
}

/// Wealth path from log returns: `equity_t = exp(sum_{i<=t} r_i)`, `t` from 1.
///
/// Non-finite returns are skipped but still consume their index.
pub fn equity_from_log_returns(log_returns: &[f64]) -> Vec<EquityPoint> {
    let mut cum = 0.0;
    log_returns
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_finite())
        .map(|(i, r)| {
            cum += r;
            EquityPoint {
                t: i + 1,
                equity: cum.exp(),
            }
        })
        .collect()
}

/// Last `n` items; `n == 0` keeps everything.
pub fn tail<T>(items: &[T], n: usize) -> &[T] {
    if n == 0 || items.len() <= n {
        return items;
    }
    &items[items.len() - n..]
}

/// Submission number -> score/rank, from a newest-first listing.
pub fn build_progress_series(items_newest_first: &[Value]) -> Vec<ProgressPoint> {
    items_newest_first
        .iter()
        .rev()
        .enumerate()
        .map(|(i, item)| ProgressPoint {
            t: i + 1,
            score: as_number(&item["score"]),
            rank: as_number(&item["rank_at_submit"]),
        })
        .collect()
}
