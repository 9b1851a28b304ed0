//! Recording adapters that capture interactions to cassettes.

pub mod clock;
pub mod transport;

pub use clock::RecordingClock;
pub use transport::RecordingTransport;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Record one interaction with its input and output.
///
/// A value that cannot be serialized is logged and left out of the cassette;
/// recording never changes what the wrapped port returns.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let (input_json, output_json) =
        match (serde_json::to_value(input), serde_json::to_value(output)) {
            (Ok(input), Ok(output)) => (input, output),
            (Err(e), _) | (_, Err(e)) => {
                warn!(port, method, error = %e, "interaction not recorded");
                return;
            }
        };

    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, input_json, output_json);
}
