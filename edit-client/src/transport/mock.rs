//! Mock transport for testing.
//!
//! Allows queueing responses per endpoint and capturing sent requests for
//! verification. Per-endpoint queues keep the mock deterministic when the
//! poll and post loops run at the same time.

use super::{Endpoint, Transport, TransportError};
use async_trait::async_trait;
use edit_types::Message;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Mock transport for testing.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    sent: Vec<(Endpoint, Vec<u8>)>,
    responses: HashMap<Endpoint, VecDeque<Vec<u8>>>,
    fail_next: HashMap<Endpoint, String>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw bytes to be returned by the next request to `endpoint`.
    pub fn queue_response(&self, endpoint: Endpoint, data: Vec<u8>) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.entry(endpoint).or_default().push_back(data);
    }

    /// Queue an encoded message to be returned by the next request to `endpoint`.
    pub fn queue_message(&self, endpoint: Endpoint, message: &Message) {
        self.queue_response(endpoint, message.to_bytes().unwrap());
    }

    /// Get all requests that were sent, in order.
    pub fn sent_messages(&self) -> Vec<(Endpoint, Vec<u8>)> {
        let inner = self.inner.lock().unwrap();
        inner.sent.clone()
    }

    /// Decoded messages sent to one endpoint, in order.
    pub fn sent_to(&self, endpoint: Endpoint) -> Vec<Message> {
        let inner = self.inner.lock().unwrap();
        inner
            .sent
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, bytes)| Message::from_bytes(bytes).unwrap())
            .collect()
    }

    /// Cause the next request to `endpoint` to fail with the given error.
    pub fn fail_next(&self, endpoint: Endpoint, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next.insert(endpoint, error.to_string());
    }

    /// Clear all state (requests, queues, failures).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockTransportInner::default();
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, endpoint: Endpoint, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.inner.lock().unwrap();

        // Check for forced failure
        if let Some(error) = inner.fail_next.remove(&endpoint) {
            return Err(TransportError::ConnectionFailed(error));
        }

        inner.sent.push((endpoint, body));
        inner
            .responses
            .get_mut(&endpoint)
            .and_then(|queue| queue.pop_front())
            .ok_or(TransportError::NoResponse)
    }
}
