//! Replaying adapter for the `ApiTransport` port.

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ApiRequest, ApiTransport, RequestOutcome, TransportFuture};

/// Serves recorded outcomes from a cassette and logs the requests it receives.
///
/// Clones share the cassette cursor and the request log.
#[derive(Clone)]
pub struct ReplayingTransport {
    replayer: Arc<Mutex<CassetteReplayer>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ReplayingTransport {
    /// Create a replaying transport backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Arc::new(Mutex::new(replayer)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a replaying transport serving the `transport::send` entries of `cassette`.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        Self::new(CassetteReplayer::new(cassette))
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Recorded outcomes not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replayer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remaining("transport", "send")
    }

    fn next_outcome(&self, request: &ApiRequest) -> RequestOutcome {
        let interaction = {
            let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
            replayer.next_interaction("transport", "send").clone()
        };

        let recorded_method = interaction.input.get("method").and_then(serde_json::Value::as_str);
        if let Some(recorded) = recorded_method {
            assert_eq!(
                recorded,
                request.method.to_string(),
                "Cassette mismatch at seq={}: recorded a {recorded} request, got {} {}",
                interaction.seq,
                request.method,
                request.path,
            );
        }

        serde_json::from_value(interaction.output).unwrap_or_else(|e| {
            RequestOutcome::PermanentError {
                status: 0,
                message: format!("cassette outcome at seq={} is malformed: {e}", interaction.seq),
            }
        })
    }
}

impl ApiTransport for ReplayingTransport {
    fn send(&self, request: &ApiRequest) -> TransportFuture<'_> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());
        let outcome = self.next_outcome(request);
        Box::pin(std::future::ready(outcome))
    }
}
