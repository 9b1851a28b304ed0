//! Rate-aware issue upserting against a GitHub-style tracker.
//!
//! A batch is processed one record at a time: [`IssueFinder`] searches for
//! an issue with the record's canonical title, then [`IssueUpserter`] either
//! creates one or appends a comment. Every API call goes through a
//! [`RetryExecutor`], and the outcome of every record lands in [`RunStats`].

pub mod backoff;
pub mod classify;
pub mod finder;
pub mod issue;
pub mod retry;
pub mod summary;
pub mod upsert;

use thiserror::Error;

pub use finder::IssueFinder;
pub use retry::{RetryError, RetryExecutor};
pub use summary::RunStats;
pub use upsert::{IssueUpserter, RecordOutcome};

/// Why a single record could not be filed.
#[derive(Debug, Error)]
pub enum UpsertError {
    /// Searching for an existing issue failed.
    #[error("search failed: {0}")]
    Search(#[source] RetryError),
    /// Creating the issue failed.
    #[error("issue creation failed: {0}")]
    Create(#[source] RetryError),
    /// Appending the comment failed.
    #[error("comment on #{number} failed: {source}")]
    Comment {
        /// The issue being commented on.
        number: u64,
        /// The underlying failure.
        source: RetryError,
    },
    /// The tracker answered with a body we could not interpret.
    #[error("unexpected {operation} response: {detail}")]
    MalformedResponse {
        /// The call whose response was malformed.
        operation: &'static str,
        /// What was wrong with it.
        detail: String,
    },
}

impl UpsertError {
    /// Returns `true` when the record failed because rate limiting persisted.
    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::Search(e) | Self::Create(e) | Self::Comment { source: e, .. } => {
                e.is_rate_limit()
            }
            Self::MalformedResponse { .. } => false,
        }
    }
}
