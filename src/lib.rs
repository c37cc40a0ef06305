//! Client-side preflight for a portfolio-allocation contest.
//!
//! The engine turns pasted weights text into a validated submission payload
//! or a single user-facing error, and projects a live preview while the user
//! types. It never performs I/O; the server stays authoritative.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tokenize`] | Split pasted text into numeric tokens |
//! | [`number`] | Strict dot-decimal parsing and typed-precision counting |
//! | [`weights`] | Weights vector parsing and the long-only sign rule |
//! | [`rules`] | Contest rules and their coercion from contest JSON |
//! | [`submission`] | Ordered submit-time validation pipeline |
//! | [`preview`] | Never-failing live preview |
//! | [`api`] | Remote contest API client |
//! | [`summary`] | Attempts left, rank and gap to the leader |
//! | [`briefing`], [`metrics`], [`series`], [`format`] | Presentation helpers |
//!
//! ```
//! use weights_preflight::{validate_submission, ContestRules};
//!
//! let rules = ContestRules::new(3, false);
//! let payload = validate_submission("0.4 0.4 0.2", "0.0", &rules, true).unwrap();
//! assert_eq!(payload.weights, vec![0.4, 0.4, 0.2]);
//! ```

pub mod api;
pub mod briefing;
pub mod config;
pub mod error;
pub mod format;
pub mod metrics;
pub mod number;
pub mod preview;
pub mod rules;
pub mod series;
pub mod submission;
pub mod summary;
pub mod tokenize;
pub mod weights;

pub use error::{ApiError, ErrorKind, SubmissionError};
pub use number::{count_typed_decimals, parse_number};
pub use preview::{project, PreviewState};
pub use rules::ContestRules;
pub use submission::{validate_submission, SubmissionPayload};
pub use tokenize::tokenize;
pub use weights::{parse_weights, validate_sign};
