//! Service context bundling all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::{LiveClock, LiveFileSystem, LiveSleeper, LiveTransport};
use crate::adapters::recording::{RecordingClock, RecordingTransport};
use crate::adapters::replaying::{ReplayingClock, ReplayingSleeper, ReplayingTransport};
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::load_cassette;
use crate::config::TrackerConfig;
use crate::ports::{ApiTransport, Clock, FileSystem, Sleeper};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Clock for the analysis date.
    pub clock: Box<dyn Clock>,
    /// Filesystem for the summary and detail reports.
    pub fs: Box<dyn FileSystem>,
    /// Transport for tracker API calls.
    pub transport: Box<dyn ApiTransport>,
    /// Sleeper for backoff and pacing waits.
    pub sleeper: Box<dyn Sleeper>,
    /// Cassette recorder shared with the recording adapters, if recording.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        fs: Box<dyn FileSystem>,
        transport: Box<dyn ApiTransport>,
        sleeper: Box<dyn Sleeper>,
    ) -> Self {
        Self {
            clock,
            fs,
            transport,
            sleeper,
            recorder: None,
        }
    }

    /// Creates a live context that talks to the configured tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(config: &TrackerConfig) -> Result<Self, String> {
        Ok(Self::new(
            Box::new(LiveClock),
            Box::new(LiveFileSystem),
            Box::new(LiveTransport::new(config)?),
            Box::new(LiveSleeper),
        ))
    }

    /// Creates a live context that also records clock and transport
    /// interactions to a cassette at `path`.
    ///
    /// This is the developer-only mechanism for capturing cassettes via the
    /// `ISSUE_UPSERT_RECORD` env var. Call [`Self::finish_recording`] to write
    /// the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn recording(config: &TrackerConfig, path: impl Into<PathBuf>) -> Result<Self, String> {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            "issue-upsert-session",
            config.slug(),
        )));
        Ok(Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            fs: Box::new(LiveFileSystem),
            transport: Box::new(RecordingTransport::new(
                Box::new(LiveTransport::new(config)?),
                Arc::clone(&recorder),
            )),
            sleeper: Box::new(LiveSleeper),
            recorder: Some(recorder),
        })
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// Clock and transport are served from the cassette, reports are read
    /// from disk, and waits return immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = load_cassette(path)?;
        Ok(Self::new(
            Box::new(ReplayingClock::from_cassette(&cassette)),
            Box::new(LiveFileSystem),
            Box::new(ReplayingTransport::from_cassette(&cassette)),
            Box::new(ReplayingSleeper::new()),
        ))
    }

    /// Drops the adapters and, when recording, writes the cassette.
    ///
    /// Returns the cassette path if one was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish_recording(self) -> Result<Option<PathBuf>, String> {
        let Self { clock, fs, transport, sleeper, recorder } = self;
        drop((clock, fs, transport, sleeper));

        let Some(recorder) = recorder else {
            return Ok(None);
        };
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| "Recording adapters still hold the cassette recorder".to_string())?
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        recorder.finish().map(Some).map_err(|e| format!("Failed to write cassette: {e}"))
    }
}
