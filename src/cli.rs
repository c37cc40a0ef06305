//! Command-line arguments for `preflight`.
//!
//! `preview` and `validate` run fully offline against rules given on the
//! command line. The remaining commands talk to the contest API configured
//! through `--base-url`/`--token` or the `PREFLIGHT_*` environment.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use weights_preflight::config::{BASE_URL_ENV, TOKEN_ENV};
use weights_preflight::rules::{ContestRules, DEFAULT_MAX_FIXED_INCOME, DEFAULT_SUM_TOL};

#[derive(Debug, Parser)]
#[command(name = "preflight", version, about = "Check and submit contest portfolio weights")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the live preview for a set of weights.
    Preview {
        #[command(flatten)]
        input: WeightsInput,
        #[command(flatten)]
        rules: RulesArgs,
    },
    /// Run the full submit-time validation and print the payload.
    Validate {
        #[command(flatten)]
        input: WeightsInput,
        #[command(flatten)]
        rules: RulesArgs,
        /// Treat the participant as not active in the contest.
        #[arg(long)]
        inactive: bool,
    },
    /// Validate against the contest's live rules, then submit.
    Submit {
        #[arg(long)]
        contest: String,
        #[command(flatten)]
        input: WeightsInput,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Check that the contest API answers.
    Status {
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Attempts left, best score, rank and gap to first place.
    Me {
        #[arg(long)]
        contest: String,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// List contests.
    Contests {
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Summarize a contest's rules.
    Briefing {
        #[arg(long)]
        contest: String,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Show the top of the leaderboard.
    Leaderboard {
        #[arg(long)]
        contest: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// List your submissions, newest first.
    Submissions {
        #[arg(long)]
        contest: String,
        #[arg(long, default_value_t = 50)]
        limit: u32,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Equity curve for one submission.
    Series {
        #[arg(long)]
        contest: String,
        #[arg(long)]
        submission: String,
        #[arg(long, default_value_t = 252)]
        tail: usize,
        #[command(flatten)]
        api: ApiArgs,
    },
}

#[derive(Debug, Args)]
pub struct WeightsInput {
    /// File with weights separated by spaces, commas, semicolons or newlines; `-` reads stdin.
    #[arg(long, conflicts_with = "weights_text")]
    pub weights: Option<PathBuf>,
    /// Weights given inline.
    #[arg(long, allow_hyphen_values = true)]
    pub weights_text: Option<String>,
    /// Fixed-income weight; use 0 when the contest has none.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub fixed_income: String,
}

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[arg(long)]
    pub n_assets: usize,
    #[arg(long)]
    pub allow_short: bool,
    #[arg(long, default_value_t = DEFAULT_SUM_TOL)]
    pub sum_tol: f64,
    #[arg(long, default_value_t = DEFAULT_MAX_FIXED_INCOME)]
    pub max_fixed_income: f64,
}

impl RulesArgs {
    pub fn to_rules(&self) -> ContestRules {
        ContestRules::new(self.n_assets, self.allow_short)
            .with_sum_tol(self.sum_tol)
            .with_max_fixed_income(self.max_fixed_income)
    }
}

#[derive(Debug, Args)]
pub struct ApiArgs {
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_args(weights: &str) -> Cli {
        Cli::try_parse_from([
            "preflight",
            "validate",
            "--weights-text",
            weights,
            "--n-assets",
            "3",
            "--allow-short",
        ])
        .expect("arguments parse")
    }

    #[test]
    fn weights_text_may_start_with_a_sign() {
        for text in ["-0.2 0.6 0.6", "- 0.2 0.6 0.6"] {
            match validate_args(text).command {
                Command::Validate { input, rules, .. } => {
                    assert_eq!(input.weights_text.as_deref(), Some(text));
                    assert!(rules.allow_short);
                }
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn negative_fixed_income_is_a_value() {
        let cli = Cli::try_parse_from([
            "preflight",
            "preview",
            "--weights-text",
            "0.6 0.5",
            "--fixed-income",
            "-0.1",
            "--n-assets",
            "2",
        ])
        .expect("arguments parse");
        assert!(matches!(cli.command, Command::Preview { input, .. } if input.fixed_income == "-0.1"));
    }

    #[test]
    fn file_and_inline_weights_conflict() {
        let err = Cli::try_parse_from([
            "preflight",
            "validate",
            "--weights",
            "w.txt",
            "--weights-text",
            "1",
            "--n-assets",
            "1",
        ])
        .expect_err("must conflict");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
