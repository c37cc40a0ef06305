use thiserror::Error;

/// Category of a rejected submission, used by callers that want more than
/// the display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong token count or missing contest rules.
    Structural,
    /// A token is not a plain dot-decimal number.
    Format,
    /// Too many typed decimal digits.
    Precision,
    /// Negative value in a long-only contest.
    Sign,
    /// Fixed income outside its allowed range.
    Range,
    /// Total allocation does not sum to one.
    Balance,
    /// Participant cannot submit right now.
    State,
}

/// Every way a weights submission can be refused before it reaches the API.
///
/// `Display` output is the exact message shown to the user.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("Please paste your weights.")]
    EmptyWeights,
    #[error("Contest rules missing (n_assets).")]
    MissingAssetCount,
    #[error("Expected {expected} weights, got {received}.")]
    WrongCount { expected: usize, received: usize },
    #[error("Invalid number at position {position}. Use \".\" for decimals.")]
    InvalidWeight { position: usize },
    #[error("Weights have more than 3 decimals at position {position}.")]
    WeightPrecision { position: usize },
    #[error("Weight {position} must be ≥ 0.")]
    NegativeWeight { position: usize },

    #[error("You are not ACTIVE in this contest.")]
    InactiveParticipant,

    #[error("Please enter fixed income weight (use 0.0 if none).")]
    EmptyFixedIncome,
    #[error("Invalid fixed income number. Use \".\" for decimals.")]
    InvalidFixedIncome,
    #[error("Fixed income has more than 3 decimals.")]
    FixedIncomePrecision,
    #[error("Fixed income must be ≥ 0 in long-only contests.")]
    NegativeFixedIncome,
    #[error("Fixed income exceeds contest max ({max}).")]
    FixedIncomeAboveMax { max: f64 },

    #[error("Weights must sum to 1 (including fixed income). Current sum = {total:.6}.")]
    Unbalanced { total: f64 },
}

impl SubmissionError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyWeights | Self::MissingAssetCount | Self::WrongCount { .. } => {
                ErrorKind::Structural
            }
            Self::InvalidWeight { .. } | Self::EmptyFixedIncome | Self::InvalidFixedIncome => {
                ErrorKind::Format
            }
            Self::WeightPrecision { .. } | Self::FixedIncomePrecision => ErrorKind::Precision,
            Self::NegativeWeight { .. } => ErrorKind::Sign,
            Self::NegativeFixedIncome | Self::FixedIncomeAboveMax { .. } => ErrorKind::Range,
            Self::Unbalanced { .. } => ErrorKind::Balance,
            Self::InactiveParticipant => ErrorKind::State,
        }
    }
}

/// Failures talking to the remote contest API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing API base URL (set PREFLIGHT_API_BASE_URL or --base-url).")]
    MissingBaseUrl,

    #[error("Not authenticated. Set PREFLIGHT_API_TOKEN or pass --token.")]
    MissingToken,

    #[error("{detail}")]
    Status { status: u16, detail: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Submission(_) => 5,
            Self::Api(ApiError::Status { .. }) => 4,
            Self::Api(_) => 3,
            Self::Command(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
