//! Replaying adapters that serve recorded interactions instead of doing I/O.

pub mod clock;
pub mod sleeper;
pub mod transport;

pub use clock::ReplayingClock;
pub use sleeper::ReplayingSleeper;
pub use transport::ReplayingTransport;
