//! Port implementations: live (real I/O), recording (live plus cassette
//! capture), and replaying (served from cassettes, no real I/O).

pub mod live;
pub mod recording;
pub mod replaying;
