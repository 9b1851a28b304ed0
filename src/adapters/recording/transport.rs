//! Recording adapter for the `ApiTransport` port.

use std::sync::{Arc, Mutex};

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{ApiRequest, ApiTransport, TransportFuture};

/// Records every request and its classified outcome while delegating to an
/// inner transport.
pub struct RecordingTransport {
    inner: Box<dyn ApiTransport>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTransport {
    /// Creates a new recording transport wrapping the given implementation.
    pub fn new(inner: Box<dyn ApiTransport>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ApiTransport for RecordingTransport {
    fn send(&self, request: &ApiRequest) -> TransportFuture<'_> {
        let pending = self.inner.send(request);
        let request = request.clone();
        Box::pin(async move {
            let outcome = pending.await;
            record_interaction(&self.recorder, "transport", "send", &request, &outcome);
            outcome
        })
    }
}
