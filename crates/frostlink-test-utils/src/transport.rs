//! Scripted transport for client tests.
//!
//! [`MockTransport`] answers requests from a queue of scripted responses
//! and records every request it sees, so tests can assert on dispatch
//! order, injected query parameters, and call counts without a live
//! appliance.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use frostlink_core::transport::{Transport, TransportError, WireRequest, WireResponse};
use serde_json::Value;

#[derive(Default)]
struct Inner {
    responses: Mutex<VecDeque<Result<ScriptedResponse, TransportError>>>,
    requests: Mutex<Vec<WireRequest>>,
}

struct ScriptedResponse {
    status: u16,
    body: Value,
}

/// A transport that replays scripted responses in FIFO order.
///
/// Clones share the same script and request log, so a test can hand one
/// clone to the client and keep another for assertions. A request arriving
/// after the script is exhausted answers with a connect error.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response with the given HTTP status and JSON body.
    pub fn push_json(&self, status: u16, body: Value) {
        self.inner
            .responses
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Ok(ScriptedResponse { status, body }));
    }

    /// Script a transport-level failure.
    pub fn push_error(&self, error: TransportError) {
        self.inner
            .responses
            .lock()
            .expect("mock script lock poisoned")
            .push_back(Err(error));
    }

    /// All requests seen so far, in dispatch order.
    pub fn requests(&self) -> Vec<WireRequest> {
        self.inner
            .requests
            .lock()
            .expect("mock request lock poisoned")
            .clone()
    }

    /// Number of requests seen so far.
    pub fn request_count(&self) -> usize {
        self.inner
            .requests
            .lock()
            .expect("mock request lock poisoned")
            .len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &WireRequest) -> Result<WireResponse, TransportError> {
        self.inner
            .requests
            .lock()
            .expect("mock request lock poisoned")
            .push(request.clone());

        let scripted = self
            .inner
            .responses
            .lock()
            .expect("mock script lock poisoned")
            .pop_front();

        match scripted {
            Some(Ok(response)) => Ok(WireResponse {
                status: response.status,
                // Mirror a real final URL, query string included, so the
                // masking path gets exercised.
                final_url: request.display_url(),
                body: response.body,
            }),
            Some(Err(error)) => Err(error),
            None => Err(TransportError::Connect(
                "no scripted response left".to_string(),
            )),
        }
    }
}
