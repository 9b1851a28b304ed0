//! Cassette record/replay of port interactions.

pub mod format;
pub mod recorder;
pub mod replayer;
