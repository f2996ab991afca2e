//! Error types shared by the activity source, the normalizer and the rank table.

use thiserror::Error;

/// Failure to obtain an activity snapshot.
///
/// Every variant stops the pipeline before ranking: no rank is ever computed
/// from a missing or partial profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("activity source request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("activity source returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("activity source reported: {0}")]
    Upstream(String),

    #[error("malformed profile response: {0}")]
    MalformedInput(String),
}

impl ProfileError {
    /// True when the provider call itself failed (network, auth, rate limit).
    pub fn is_upstream(&self) -> bool {
        !matches!(self, ProfileError::MalformedInput(_))
    }
}

/// Rejected tier table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankConfigError {
    #[error("tier table is empty")]
    Empty,

    #[error("lowest tier '{label}' must start at 0, found {min_score}")]
    NonZeroBase { label: String, min_score: u64 },

    #[error("tier '{label}' minimum {min_score} must be above {previous}")]
    NotAscending {
        label: String,
        min_score: u64,
        previous: u64,
    },

    #[error("tier #{0} has a blank label")]
    BlankLabel(usize),

    #[error("tier label '{0}' is used more than once")]
    DuplicateLabel(String),
}
