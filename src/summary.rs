//! Dashboard numbers for the current participant: attempts left, best score,
//! rank and distance to the leader.
//!
//! The backend has shipped several shapes for `attempts`, so each figure is the
//! first number found along a list of known paths.

use serde::Serialize;
use serde_json::Value;

use crate::api::{LeaderboardResponse, MeResponse};
use crate::metrics::pick_first_number;
use crate::number::round_to;

/// Places kept on the gap so float noise does not leak into output.
const GAP_DECIMALS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingOrder {
    /// Lower scores rank higher.
    Asc,
    Desc,
}

impl RankingOrder {
    /// `contest.ranking.order`, descending unless it says "asc".
    pub fn from_contest(contest: &Value) -> Self {
        match contest["ranking"]["order"].as_str() {
            Some(o) if o.trim().eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub primary_metric: Option<String>,
    pub daily_left: Option<f64>,
    pub total_left: Option<f64>,
    pub best_score: Option<f64>,
    pub rank: Option<f64>,
    pub top1_score: Option<f64>,
    pub gap_vs_top1: Option<f64>,
}

pub fn daily_left(attempts: &Value) -> Option<f64> {
    pick_first_number([
        &attempts["left_before"]["daily_left"],
        &attempts["left_before"]["daily_submissions_left"],
        &attempts["left"]["daily_submissions_left"],
        &attempts["daily_left"],
        &attempts["daily_submissions_left"],
    ])
}

pub fn total_left(attempts: &Value) -> Option<f64> {
    pick_first_number([
        &attempts["left_before"]["total_left"],
        &attempts["left_before"]["total_submissions_left"],
        &attempts["left"]["total_submissions_left"],
        &attempts["total_left"],
        &attempts["total_submissions_left"],
    ])
}

/// Score distance to rank 1, positive when behind.
///
/// No rank means no gap; the leader's gap is 0 even without scores.
pub fn gap_vs_top1(rank: Option<f64>, best: Option<f64>, top1: Option<f64>, order: RankingOrder) -> Option<f64> {
    let rank = rank?;
    if rank == 1.0 {
        return Some(0.0);
    }
    let (best, top1) = (best?, top1?);
    let gap = match order {
        RankingOrder::Asc => best - top1,
        RankingOrder::Desc => top1 - best,
    };
    Some(round_to(gap, GAP_DECIMALS))
}

pub fn summarize(contest: &Value, me: &MeResponse, board: &LeaderboardResponse) -> DashboardSummary {
    let best_score = pick_first_number([&me.leaderboard_me["best_score"]]);
    let rank = pick_first_number([&board.me["rank"], &me.leaderboard_me["rank"]]);
    let top1_score = board.top.first().and_then(|e| e.best_score.or(e.last_score));

    DashboardSummary {
        primary_metric: contest["ranking"]["primary_metric"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        daily_left: daily_left(&me.attempts),
        total_left: total_left(&me.attempts),
        best_score,
        rank,
        top1_score,
        gap_vs_top1: gap_vs_top1(rank, best_score, top1_score, RankingOrder::from_contest(contest)),
    }
}
