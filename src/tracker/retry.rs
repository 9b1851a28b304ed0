//! Bounded retries with exponential backoff around single API calls.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::backoff::{self, RetryKind};
use crate::ports::{RequestOutcome, Sleeper};

/// Longest `Retry-After` hint honoured; larger hints are clamped to this.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

/// Terminal failure of a retried call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// Every attempt was rate limited or failed at the network level.
    #[error("{reason} after {attempts} attempt(s): {message}")]
    Exhausted {
        /// Classification of the last attempt.
        reason: RetryKind,
        /// Attempts made, including the first.
        attempts: u32,
        /// Diagnostic text of the last attempt.
        message: String,
    },
    /// The tracker rejected the request; retrying would not help.
    #[error("HTTP {status}: {message}")]
    Permanent {
        /// HTTP status code.
        status: u16,
        /// The tracker's message.
        message: String,
    },
}

impl RetryError {
    /// Returns `true` when the call gave up because of rate limiting.
    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::Exhausted { reason: RetryKind::RateLimit, .. })
    }
}

/// Runs an operation until it succeeds, fails permanently, or runs out of attempts.
pub struct RetryExecutor<'a> {
    sleeper: &'a dyn Sleeper,
    base_delay: Duration,
    max_attempts: u32,
}

impl<'a> RetryExecutor<'a> {
    /// Creates an executor; `max_attempts` below 1 is raised to 1.
    #[must_use]
    pub fn new(sleeper: &'a dyn Sleeper, base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            sleeper,
            base_delay,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Maximum attempts per call, including the first.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Executes `operation`, retrying rate-limited and transient outcomes.
    ///
    /// Between attempts the executor sleeps the backoff delay for the outcome
    /// kind, or the tracker's `Retry-After` hint when that is longer. Hints
    /// above [`MAX_RETRY_AFTER`] are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::Permanent`] on the first permanent outcome and
    /// [`RetryError::Exhausted`] when the last allowed attempt is not a success.
    pub async fn execute<F, Fut>(&self, mut operation: F) -> Result<serde_json::Value, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RequestOutcome>,
    {
        let mut attempt = 1;
        loop {
            let (kind, message, hint) = match operation().await {
                RequestOutcome::Success(payload) => {
                    if attempt > 1 {
                        debug!(attempt, "request succeeded after retry");
                    }
                    return Ok(payload);
                }
                RequestOutcome::PermanentError { status, message } => {
                    return Err(RetryError::Permanent { status, message });
                }
                RequestOutcome::RateLimited {
                    retry_after_secs,
                    message,
                } => (RetryKind::RateLimit, message, retry_after_secs.map(clamp_hint)),
                RequestOutcome::TransientError { message } => {
                    (RetryKind::Transient, message, None)
                }
            };

            if attempt >= self.max_attempts {
                return Err(RetryError::Exhausted {
                    reason: kind,
                    attempts: attempt,
                    message,
                });
            }

            let wait = backoff::delay(kind, attempt, self.base_delay)
                .max(hint.unwrap_or_default());
            warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_secs = wait.as_secs_f64(),
                reason = %message,
                "{kind}, retrying"
            );
            self.sleeper.sleep(wait).await;
            attempt += 1;
        }
    }
}

fn clamp_hint(secs: u64) -> Duration {
    let hint = Duration::from_secs(secs);
    if hint > MAX_RETRY_AFTER {
        warn!(
            retry_after_secs = secs,
            max_secs = MAX_RETRY_AFTER.as_secs(),
            "Retry-After hint too long, clamping"
        );
        return MAX_RETRY_AFTER;
    }
    hint
}
