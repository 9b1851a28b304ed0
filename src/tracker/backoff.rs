//! Exponential backoff delays for retried API calls.

use std::fmt;
use std::time::Duration;

/// Exponents above this saturate; `2^31` times any useful base is already
/// longer than a run.
const MAX_EXPONENT: u32 = 31;

/// Why a call is being retried; selects the growth curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryKind {
    /// The tracker answered with a rate-limit response.
    RateLimit,
    /// The request never got a response.
    Transient,
}

impl fmt::Display for RetryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimit => f.write_str("rate limit persists"),
            Self::Transient => f.write_str("request failed"),
        }
    }
}

/// Delay before retrying after failed attempt number `attempt` (1-based).
///
/// Rate limits wait `base * 2^attempt`; transient failures wait one step less,
/// `base * 2^(attempt - 1)`. Attempt `0` is treated as `1`.
#[must_use]
pub fn delay(kind: RetryKind, attempt: u32, base: Duration) -> Duration {
    let attempt = attempt.max(1);
    let exponent = match kind {
        RetryKind::RateLimit => attempt,
        RetryKind::Transient => attempt - 1,
    };
    base.saturating_mul(2u32.saturating_pow(exponent.min(MAX_EXPONENT)))
}
