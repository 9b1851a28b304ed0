//! Sleeper port for blocking waits between requests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future type alias used by [`Sleeper`] to keep the trait dyn-compatible.
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Waits for a given duration.
///
/// Backoff waits, the inter-record delay and the rate-limit cooldown all go
/// through this port, so tests can observe every wait without spending
/// wall-clock time.
pub trait Sleeper: Send + Sync {
    /// Suspends the caller for `duration`.
    fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}
