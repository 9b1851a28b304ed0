//! Live adapters for real external interactions.

pub mod clock;
pub mod filesystem;
pub mod sleeper;
pub mod transport;

pub use clock::LiveClock;
pub use filesystem::LiveFileSystem;
pub use sleeper::LiveSleeper;
pub use transport::LiveTransport;
