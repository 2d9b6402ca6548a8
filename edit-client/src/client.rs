//! CollabClient - the main interface for Quill.
//!
//! This module provides [`CollabClient`], which owns one client's two
//! replicas and performs the connect, post and get exchanges.
//!
//! # Architecture
//!
//! CollabClient uses the pure state machine and replicas from edit-core and
//! performs the actual I/O via the Transport trait.
//!
//! ```text
//! Editor ──edit──► WorkingModel ──ChangeRequest──► post ──► Transport
//!                       ▲                                      │
//!                       └──mirror── VerifiedModel ◄──replay── get
//! ```
//!
//! Lock order is always `verified` before `working`. The verified model is
//! only written by [`CollabClient::poll`].
//!
//! # Example
//!
//! ```ignore
//! use edit_client::{ClientConfig, CollabClient, HttpTransport};
//!
//! let transport = HttpTransport::new("http://127.0.0.1:4444")?;
//! let client = CollabClient::new(ClientConfig::default(), transport);
//!
//! client.connect().await?;
//! client.create_document("Untitled").await?;
//! client.poll().await?;
//! ```

use edit_core::{
    ConnectionState, Document, DocumentTable, Event, ReplayError, SyncEvent, VerifiedModel,
    WorkingModel,
};
use edit_types::{
    Change, ChangeRequest, ClientId, Connect, DocId, Get, Message, Post, PostResult, VersionId,
    WireError,
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};

use crate::config::ClientConfig;
use crate::transport::{Endpoint, Transport, TransportError};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Message encoding or decoding failed.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// The server sent a record that does not continue the replayed history.
    #[error("replay error: {0}")]
    Replay(#[from] ReplayError),

    /// No client id assigned yet.
    #[error("not connected")]
    NotConnected,

    /// The working model has no document with this id.
    #[error("unknown document {0}")]
    UnknownDocument(DocId),

    /// A sync loop ended abnormally.
    #[error("sync task failed: {0}")]
    TaskFailed(String),
}

impl ClientError {
    /// Whether the error breaks an invariant the client cannot recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Replay(_) | Self::TaskFailed(_))
    }
}

const EVENT_CAPACITY: usize = 64;

/// One collaborating client.
///
/// Manages the connection lifecycle and both document replicas.
pub struct CollabClient<T: Transport> {
    config: ClientConfig,
    transport: T,
    state: Mutex<ConnectionState>,
    poll_gate: Mutex<()>,
    verified: Mutex<VerifiedModel>,
    working: Mutex<WorkingModel>,
    events: broadcast::Sender<SyncEvent>,
}

impl<T: Transport> std::fmt::Debug for CollabClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollabClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> CollabClient<T> {
    /// Create a disconnected client with empty replicas.
    pub fn new(config: ClientConfig, transport: T) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            config,
            transport,
            state: Mutex::new(ConnectionState::new()),
            poll_gate: Mutex::new(()),
            verified: Mutex::new(VerifiedModel::new()),
            working: Mutex::new(WorkingModel::new()),
            events,
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a reference to the underlying transport (for testing).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Subscribe to lifecycle and failure notices.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> ConnectionState {
        self.state.lock().await.clone()
    }

    /// The server-assigned id, once connected.
    pub async fn client_id(&self) -> Option<ClientId> {
        self.state.lock().await.client_id()
    }

    /// Feed one event to the state machine and publish any emitted events.
    async fn transition(&self, event: Event) {
        let mut state = self.state.lock().await;
        let (new_state, actions) = state.clone().on_event(event);
        *state = new_state;
        drop(state);

        for action in actions {
            if let edit_core::Action::EmitEvent(event) = action {
                self.emit(event);
            }
        }
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Send one message and decode the reply.
    async fn exchange(&self, endpoint: Endpoint, message: &Message) -> Result<Message, ClientError> {
        let reply = self.transport.request(endpoint, message.to_bytes()?).await?;
        Ok(Message::from_bytes(&reply)?)
    }

    /// Ask the server for a client id (one attempt).
    ///
    /// Returns the existing id when already connected. A failure leaves the
    /// client in `Connecting`.
    pub async fn connect(&self) -> Result<ClientId, ClientError> {
        self.transition(Event::ConnectRequested).await;
        if let Some(client_id) = self.client_id().await {
            return Ok(client_id);
        }

        let result = match self.exchange(Endpoint::Connect, &Message::Connect(Connect {})).await {
            Ok(Message::ConnectResponse(response)) => Ok(response.client_id),
            Ok(other) => Err(ClientError::Wire(WireError::UnexpectedMessage {
                expected: "ConnectResponse",
                actual: other.kind(),
            })),
            Err(e) => Err(e),
        };

        match result {
            Ok(assigned) => {
                self.transition(Event::ConnectSucceeded {
                    client_id: assigned,
                })
                .await;
                // A concurrent connect may have won; its id is the one kept.
                let client_id = self.client_id().await.unwrap_or(assigned);
                if client_id == assigned {
                    tracing::info!("Connected as client {}", client_id);
                } else {
                    tracing::debug!("Discarding client id {}; already {}", assigned, client_id);
                }
                Ok(client_id)
            }
            Err(e) => {
                self.transition(Event::ConnectFailed {
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    /// Connect, retrying after the configured delay until the server answers.
    pub async fn connect_with_retry(&self) -> ClientId {
        loop {
            match self.connect().await {
                Ok(client_id) => return client_id,
                Err(e) => {
                    tracing::warn!(
                        "Connect failed: {}; retrying in {:?}",
                        e,
                        self.config.connect_retry()
                    );
                    tokio::time::sleep(self.config.connect_retry()).await;
                    self.transition(Event::RetryElapsed).await;
                }
            }
        }
    }

    /// Fetch records after the verified model's version and replay them.
    ///
    /// Each record is replayed into the verified model, then mirrored into
    /// the working model. Returns the number of records replayed.
    pub async fn poll(&self) -> Result<usize, ClientError> {
        let client_id = self.client_id().await.ok_or(ClientError::NotConnected)?;
        let _gate = self.poll_gate.lock().await;

        let since = self.verified.lock().await.last_seen();
        let records = match self
            .exchange(Endpoint::Get, &Message::Get(Get { version_id: since }))
            .await?
        {
            Message::GetResponse(response) => response.records,
            other => {
                return Err(ClientError::Wire(WireError::UnexpectedMessage {
                    expected: "GetResponse",
                    actual: other.kind(),
                }))
            }
        };

        let mut verified = self.verified.lock().await;
        let mut working = self.working.lock().await;
        for record in &records {
            verified.replay(record)?;
            working.mirror(record, Some(client_id));
            tracing::debug!(
                "Replayed {} on doc {} from client {} at version {}",
                record.operation_type(),
                record.doc_id,
                record.client_id,
                record.version_id
            );
        }
        Ok(records.len())
    }

    /// Apply a local edit to the working model and build its change request.
    ///
    /// The request declares the version the working model had absorbed when
    /// the edit was made.
    pub async fn edit(&self, doc_id: DocId, change: &Change) -> Result<ChangeRequest, ClientError> {
        let client_id = self.client_id().await.ok_or(ClientError::NotConnected)?;
        if let Change::NewDoc { title } = change {
            return self.new_document(title).await;
        }

        let mut working = self.working.lock().await;
        let (applied, last_seen) = working
            .apply_local(doc_id, change)
            .ok_or(ClientError::UnknownDocument(doc_id))?;
        Ok(ChangeRequest::from_change(
            Some(doc_id),
            client_id,
            last_seen,
            &applied,
        ))
    }

    /// Build a NewDoc request. The document appears locally once its record is polled.
    pub async fn new_document(&self, title: &str) -> Result<ChangeRequest, ClientError> {
        let client_id = self.client_id().await.ok_or(ClientError::NotConnected)?;
        let last_seen = self.working.lock().await.as_of();
        Ok(ChangeRequest::from_change(
            None,
            client_id,
            last_seen,
            &Change::NewDoc {
                title: title.to_string(),
            },
        ))
    }

    /// Submit one change request.
    ///
    /// A failure result is logged and published as [`SyncEvent::PostFailed`];
    /// the optimistic working-model edit is left in place.
    pub async fn post(&self, request: ChangeRequest) -> Result<PostResult, ClientError> {
        let operation = request.operation_type;
        let reply = self
            .exchange(Endpoint::Post, &Message::Post(Post { request }))
            .await;

        let result = match reply {
            Ok(Message::PostResponse(response)) => Ok(response.result),
            Ok(other) => Err(ClientError::Wire(WireError::UnexpectedMessage {
                expected: "PostResponse",
                actual: other.kind(),
            })),
            Err(e) => Err(e),
        };

        let error = match &result {
            Ok(PostResult::Success) => None,
            Ok(PostResult::Failure) => Some("rejected by server".to_string()),
            Err(e) => Some(e.to_string()),
        };
        if let (Some(error), Some(operation)) = (error, operation) {
            tracing::warn!("{} edit failed: {}", operation, error);
            self.emit(SyncEvent::PostFailed { operation, error });
        }
        result
    }

    /// Edit locally and post immediately.
    pub async fn submit(&self, doc_id: DocId, change: &Change) -> Result<PostResult, ClientError> {
        let request = self.edit(doc_id, change).await?;
        self.post(request).await
    }

    /// Request a new document and post immediately.
    pub async fn create_document(&self, title: &str) -> Result<PostResult, ClientError> {
        let request = self.new_document(title).await?;
        self.post(request).await
    }

    /// Full resync: overwrite the working model from the verified model.
    pub async fn resync(&self) {
        let verified = self.verified.lock().await;
        let mut working = self.working.lock().await;
        working.overwrite_from(&verified);
        tracing::debug!("Resynced working model at version {}", verified.last_seen());
    }

    /// Newest version replayed into the verified model.
    pub async fn last_seen(&self) -> VersionId {
        self.verified.lock().await.last_seen()
    }

    /// Working copy of one document.
    pub async fn working_document(&self, doc_id: DocId) -> Option<Document> {
        self.working.lock().await.documents().get(doc_id).cloned()
    }

    /// Verified copy of one document.
    pub async fn verified_document(&self, doc_id: DocId) -> Option<Document> {
        self.verified.lock().await.documents().get(doc_id).cloned()
    }

    /// Snapshot of every working document.
    pub async fn working_documents(&self) -> DocumentTable {
        self.working.lock().await.documents().clone()
    }

    /// Snapshot of every verified document.
    pub async fn verified_documents(&self) -> DocumentTable {
        self.verified.lock().await.documents().clone()
    }
}
