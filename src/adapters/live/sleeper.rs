//! Live sleeper backed by the tokio timer.

use std::time::Duration;

use crate::ports::sleeper::{SleepFuture, Sleeper};

/// Waits for real.
pub struct LiveSleeper;

impl Sleeper for LiveSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}
