//! Sleeper that returns immediately and remembers what it was asked to wait.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::ports::sleeper::{SleepFuture, Sleeper};

/// Records requested waits without waiting.
///
/// Clones share the same log, so a test can keep one handle and give the
/// other to a [`crate::context::ServiceContext`].
#[derive(Clone, Default)]
pub struct ReplayingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl ReplayingSleeper {
    /// Creates a sleeper with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, in order.
    #[must_use]
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Sleeper for ReplayingSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        self.waits.lock().unwrap_or_else(PoisonError::into_inner).push(duration);
        Box::pin(std::future::ready(()))
    }
}
