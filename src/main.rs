mod cli;

use std::io::Read;

use clap::Parser;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weights_preflight::api::{find_listing, listing_contest_id, listing_label, ApiStatus, ContestApi, ContestView};
use weights_preflight::briefing::build_briefing;
use weights_preflight::config::{env_bool, ClientConfig, LOG_JSON_ENV};
use weights_preflight::error::{ApiError, CliError};
use weights_preflight::format::{fixed6, format_when, pretty};
use weights_preflight::metrics::{format_metric_value, primary_metric_label};
use weights_preflight::rules::{participant_is_active, ContestRules};
use weights_preflight::series::{build_progress_series, equity_from_log_returns, tail};
use weights_preflight::summary::summarize;
use weights_preflight::{project, validate_submission, PreviewState};

use crate::cli::{ApiArgs, Cli, Command, WeightsInput};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if env_bool(LOG_JSON_ENV, false) {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(error) = run(Cli::parse()).await {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Preview { input, rules } => {
            let weights = read_weights(&input)?;
            let preview = project(&weights, &input.fixed_income, &rules.to_rules());
            print_preview(&preview);
        }
        Command::Validate { input, rules, inactive } => {
            let weights = read_weights(&input)?;
            let payload = validate_submission(&weights, &input.fixed_income, &rules.to_rules(), !inactive)?;
            println!("{}", serde_json::to_string(&payload)?);
        }
        Command::Submit { contest, input, api } => submit(&contest, &input, &api).await?,
        Command::Status { api } => {
            let status = ApiStatus::check(ClientConfig::resolve(api.base_url, api.token)).await;
            println!("{}", serde_json::to_string(&status)?.trim_matches('"'));
        }
        Command::Me { contest, api } => {
            let client = client(&api)?;
            let me = client.me(&contest).await?;
            let board = client.leaderboard(&contest, 1).await?;
            let view = if me.contest.is_null() {
                let listing = client.list_contests().await?;
                ContestView::resolve(Some(&me), find_listing(&listing, &contest))
            } else {
                ContestView::resolve(Some(&me), None)
            };
            let s = summarize(&view.contest, &me, &board);

            let whole = |n: Option<f64>| n.map_or_else(|| "—".to_string(), |n| n.to_string());
            let three = |n: Option<f64>| n.map_or_else(|| "—".to_string(), |n| format!("{n:.3}"));
            let metric = s
                .primary_metric
                .as_deref()
                .map_or_else(|| "metric".to_string(), primary_metric_label);
            println!("Your rank:        {}", whole(s.rank));
            println!("Your best ({metric}): {}", three(s.best_score));
            println!("Gap vs #1:        {}", three(s.gap_vs_top1));
            println!("Attempts left:    {} / {}", whole(s.daily_left), whole(s.total_left));
        }
        Command::Contests { api } => {
            let contests = client(&api)?.list_contests().await?;
            for c in &contests {
                let id = listing_contest_id(c).unwrap_or("?");
                println!("{id}\t{}", listing_label(c));
            }
        }
        Command::Briefing { contest, api } => {
            let view = contest_view(&client(&api)?, &contest).await?;
            println!("{}", pretty(&build_briefing(&view.contest)));
        }
        Command::Leaderboard { contest, limit, api } => {
            let board = client(&api)?.leaderboard(&contest, limit).await?;
            for row in &board.top {
                let metric = row.primary_metric.as_deref().map(primary_metric_label).unwrap_or_default();
                println!(
                    "{:>4}  {:<24} best={} last={} {}",
                    row.rank,
                    row.actor_id,
                    fixed6(row.best_score),
                    fixed6(row.last_score),
                    metric
                );
            }
        }
        Command::Submissions { contest, limit, api } => {
            let items = client(&api)?.submissions(&contest, limit).await?;
            for it in &items {
                println!(
                    "{}  {}  score={}  rank={}",
                    format_when(it.created_at.as_deref()),
                    it.submission_id,
                    fixed6(it.score),
                    it.rank_at_submit.map_or_else(|| "—".to_string(), |r| r.to_string())
                );
            }
            let raw: Vec<_> = items
                .iter()
                .map(|it| json!({ "score": it.score, "rank_at_submit": it.rank_at_submit }))
                .collect();
            println!("progress (oldest first):");
            for p in build_progress_series(&raw) {
                let rank = p.rank.map_or_else(|| "—".to_string(), |r| r.to_string());
                println!("  #{:<3} score={} rank={}", p.t, fixed6(p.score), rank);
            }
        }
        Command::Series { contest, submission, tail: n, api } => {
            let series = client(&api)?.submission_series(&contest, &submission, n).await?;
            let returns = series
                .portfolio_returns
                .or(series.returns)
                .unwrap_or_default();
            for p in tail(&equity_from_log_returns(&returns), n) {
                println!("{}\t{:.6}", p.t, p.equity);
            }
        }
    }
    Ok(())
}

fn client(api: &ApiArgs) -> Result<ContestApi, CliError> {
    let config = ClientConfig::resolve(api.base_url.clone(), api.token.clone())?;
    Ok(ContestApi::new(config)?)
}

/// Contest document and participant record, from `/me` first and the
/// `/contests` listing for anything it leaves out.
async fn contest_view(client: &ContestApi, contest_id: &str) -> Result<ContestView, CliError> {
    let me = match client.me(contest_id).await {
        Ok(me) => Some(me),
        Err(ApiError::Status { status, detail }) => {
            warn!(contest_id, status, %detail, "no participant view, using contest listing");
            None
        }
        Err(e) => return Err(e.into()),
    };
    let view = ContestView::resolve(me.as_ref(), None);
    if view.is_complete() {
        return Ok(view);
    }
    let listing = client.list_contests().await?;
    Ok(ContestView::resolve(me.as_ref(), find_listing(&listing, contest_id)))
}

fn read_weights(input: &WeightsInput) -> Result<String, CliError> {
    if let Some(text) = &input.weights_text {
        return Ok(text.clone());
    }
    match input.weights.as_deref() {
        Some(path) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Err(CliError::Command("pass --weights <FILE|-> or --weights-text".to_string())),
    }
}

fn print_preview(p: &PreviewState) {
    let expected = if p.expected_count > 0 {
        p.expected_count.to_string()
    } else {
        "—".to_string()
    };
    println!("Entered:      {} / {}", p.entered_count, expected);
    println!("Sum (assets): {}", fixed6(p.sum_assets));
    println!("Fixed income: {}", fixed6(p.fixed_income));
    let verdict = match (p.total, p.total_ok) {
        (Some(_), true) => "  OK",
        (Some(_), false) => "  Must equal 1",
        (None, _) => "",
    };
    println!("Total:        {}{}", fixed6(p.total), verdict);
    for e in p.field_errors() {
        println!("! {e}");
    }
}

async fn submit(contest_id: &str, input: &WeightsInput, api: &ApiArgs) -> Result<(), CliError> {
    let weights = read_weights(input)?;
    let client = client(api)?;

    let view = contest_view(&client, contest_id).await?;
    let rules = ContestRules::from_contest(&view.contest);

    let payload = validate_submission(
        &weights,
        &input.fixed_income,
        &rules,
        participant_is_active(&view.participant),
    )?;

    let resp = client.submit(contest_id, &payload).await?;
    info!(submission_id = %resp.submission_id, status = ?resp.status, "submission scored");

    println!("{} ({:?})", resp.submission_id, resp.status);
    println!("{}", format_metric_value(&resp.primary_metric, &json!(resp.score)));
    for (key, value) in &resp.metrics {
        if key != &resp.primary_metric {
            println!("  {}", format_metric_value(key, value));
        }
    }
    Ok(())
}
