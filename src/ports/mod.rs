//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the upsert core and an external
//! system (time, filesystem, the tracker's HTTP API, waiting).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod sleeper;
pub mod transport;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use sleeper::{SleepFuture, Sleeper};
pub use transport::{ApiRequest, ApiTransport, Method, RequestOutcome, TransportFuture};
