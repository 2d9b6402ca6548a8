//! Convergence harness: several clients sharing one in-process reconciler.
//!
//! [`LoopbackTransport`] hands encoded messages straight to a
//! [`Reconciler`], so scenarios exercise the full encode, dispatch, decode
//! path without sockets. It can also drop posts to model edits lost in
//! transit.

use async_trait::async_trait;
use edit_client::{ClientConfig, ClientError, CollabClient, Endpoint, Transport, TransportError};
use edit_core::DocumentTable;
use edit_server::{Config, Reconciler};
use edit_types::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Transport that calls a reconciler in the same process.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    reconciler: Arc<Reconciler>,
    drop_posts: Arc<AtomicUsize>,
}

impl LoopbackTransport {
    /// Transport for `reconciler`.
    pub fn new(reconciler: Arc<Reconciler>) -> Self {
        Self {
            reconciler,
            drop_posts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Lose the next `count` posts before they reach the server.
    pub fn drop_next_posts(&self, count: usize) {
        self.drop_posts.fetch_add(count, Ordering::SeqCst);
    }

    fn take_dropped_post(&self) -> bool {
        self.drop_posts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn request(&self, endpoint: Endpoint, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        if endpoint == Endpoint::Post && self.take_dropped_post() {
            tracing::debug!("Loopback dropped a post");
            return Err(TransportError::ConnectionFailed("post dropped".into()));
        }

        let message =
            Message::from_bytes(&body).map_err(|e| TransportError::RequestFailed(e.to_string()))?;
        let reply = self
            .reconciler
            .handle(endpoint.path(), message)
            .await
            .map_err(|e| TransportError::Status {
                status: 400,
                body: e.to_string(),
            })?;
        reply
            .to_bytes()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))
    }
}

/// Client type used by the harness.
pub type LoopbackClient = CollabClient<LoopbackTransport>;

/// One reconciler plus the clients connected to it.
#[derive(Debug)]
pub struct Cluster {
    reconciler: Arc<Reconciler>,
    clients: Vec<Arc<LoopbackClient>>,
}

impl Default for Cluster {
    fn default() -> Self {
        Self::new()
    }
}

impl Cluster {
    /// Fresh server with no clients.
    pub fn new() -> Self {
        Self {
            reconciler: Arc::new(Reconciler::new(Config::default())),
            clients: Vec::new(),
        }
    }

    /// The shared reconciler.
    pub fn reconciler(&self) -> &Arc<Reconciler> {
        &self.reconciler
    }

    /// Connect a new client.
    pub async fn join(&mut self) -> Result<Arc<LoopbackClient>, ClientError> {
        let transport = LoopbackTransport::new(Arc::clone(&self.reconciler));
        let client = Arc::new(CollabClient::new(ClientConfig::default(), transport));
        client.connect().await?;
        self.clients.push(Arc::clone(&client));
        Ok(client)
    }

    /// Every connected client, in join order.
    pub fn clients(&self) -> &[Arc<LoopbackClient>] {
        &self.clients
    }

    /// Poll every client until none has anything left to replay.
    pub async fn settle(&self) -> Result<(), ClientError> {
        for client in &self.clients {
            while client.poll().await? > 0 {}
        }
        Ok(())
    }

    /// Compare every client's verified documents with the server's.
    ///
    /// Returns a description of the first difference found.
    pub async fn check_converged(&self) -> Result<(), String> {
        let server = self.reconciler.documents().await;
        let head = self.reconciler.head().await;

        for client in &self.clients {
            let id = client
                .client_id()
                .await
                .map(|id| id.to_string())
                .unwrap_or_else(|| "?".into());
            if client.last_seen().await != head {
                return Err(format!(
                    "client {} replayed to {}, server is at {}",
                    id,
                    client.last_seen().await,
                    head
                ));
            }
            let verified = client.verified_documents().await;
            if verified != server {
                return Err(format!(
                    "client {} diverged:\n  client: {}\n  server: {}",
                    id,
                    describe(&verified),
                    describe(&server)
                ));
            }
        }
        Ok(())
    }
}

fn describe(documents: &DocumentTable) -> String {
    documents
        .iter()
        .map(|(id, doc)| format!("[{}] {:?}", id, doc.content().text()))
        .collect::<Vec<_>>()
        .join(", ")
}
