//! Duplicate detection by exact canonical-title match.

use serde::Deserialize;
use tracing::debug;

use super::issue::{canonical_title, search_query, TrackerIssue};
use super::retry::RetryExecutor;
use super::UpsertError;
use crate::ports::{ApiRequest, ApiTransport};

/// Search endpoint path below the API base URL.
const SEARCH_PATH: &str = "/search/issues";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<TrackerIssue>,
}

/// Finds the open issue already filed for a subject.
pub struct IssueFinder<'a> {
    transport: &'a dyn ApiTransport,
    executor: &'a RetryExecutor<'a>,
    owner: &'a str,
    repo: &'a str,
}

impl<'a> IssueFinder<'a> {
    /// Creates a finder searching `owner/repo`.
    #[must_use]
    pub fn new(
        transport: &'a dyn ApiTransport,
        executor: &'a RetryExecutor<'a>,
        owner: &'a str,
        repo: &'a str,
    ) -> Self {
        Self {
            transport,
            executor,
            owner,
            repo,
        }
    }

    /// Returns the number of the first open issue titled exactly
    /// `canonical_title(subject)`, or `None`.
    ///
    /// The tracker's title search matches substrings, so results are
    /// filtered here by exact equality.
    ///
    /// # Errors
    ///
    /// Returns [`UpsertError::Search`] when the search fails after retries and
    /// [`UpsertError::MalformedResponse`] when the result cannot be read.
    pub async fn find(&self, subject: &str) -> Result<Option<u64>, UpsertError> {
        let request = ApiRequest::get(
            SEARCH_PATH,
            vec![("q".to_string(), search_query(self.owner, self.repo, subject))],
        );
        let payload = self
            .executor
            .execute(|| self.transport.send(&request))
            .await
            .map_err(UpsertError::Search)?;

        let response: SearchResponse =
            serde_json::from_value(payload).map_err(|e| UpsertError::MalformedResponse {
                operation: "search",
                detail: e.to_string(),
            })?;

        let title = canonical_title(subject);
        let found = response.items.iter().find(|issue| issue.title == title).map(|i| i.number);
        debug!(subject, candidates = response.items.len(), ?found, "searched for existing issue");
        Ok(found)
    }
}
