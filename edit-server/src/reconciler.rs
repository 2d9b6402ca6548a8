//! The server reconciler: the single serialization point for all edits.
//!
//! [`Reconciler`] owns one [`ServerModel`] (document store plus change log)
//! behind a `tokio::sync::RwLock`. A post holds the write lock across
//! transform, mutate and append, so positions are always transformed
//! against exactly the log they are appended to. Gets share the read lock
//! and never observe a half-applied post.

use edit_core::{transform_change, ChangeLog, Document, DocumentTable};
use edit_types::{
    Change, ChangeRecord, ChangeRequest, ClientId, ConnectResponse, DocId, Get, GetResponse,
    Message, Post, PostResponse, PostResult, ValidatedRequest, ValidationError, VersionId,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::{Result, ServerError};

/// Operational metrics for monitoring server activity.
///
/// All counters are monotonically increasing (reset only on restart).
#[derive(Debug, Default)]
pub struct ServerMetrics {
    /// Client ids handed out.
    pub connects_total: AtomicU64,
    /// Posts received, valid or not.
    pub posts_total: AtomicU64,
    /// Posts rejected as malformed.
    pub posts_rejected: AtomicU64,
    /// Posts targeting a document that does not exist.
    pub posts_ignored: AtomicU64,
    /// Get requests served.
    pub polls_total: AtomicU64,
    /// Records returned across all gets.
    pub records_served: AtomicU64,
}

/// What happened to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// Applied and appended to the log.
    Applied(ChangeRecord),
    /// Target document does not exist; nothing changed.
    Ignored,
    /// Malformed; nothing changed.
    Rejected(ValidationError),
}

impl PostOutcome {
    /// Result reported to the client. Ignored posts count as success.
    pub fn result(&self) -> PostResult {
        match self {
            Self::Applied(_) | Self::Ignored => PostResult::Success,
            Self::Rejected(_) => PostResult::Failure,
        }
    }
}

/// Counts read together under one read lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSnapshot {
    /// Number of documents.
    pub documents: usize,
    /// Version of the newest record.
    pub head: VersionId,
    /// Records in the log.
    pub records: usize,
}

impl ModelSnapshot {
    /// Whether the log head matches its length, i.e. versions are gap-free.
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.head.value()).map_or(false, |head| head == self.records)
    }
}

/// Authoritative document store and change log.
#[derive(Debug, Default)]
pub struct ServerModel {
    documents: DocumentTable,
    log: ChangeLog,
    last_doc_id: u64,
}

impl ServerModel {
    /// Transform, mutate and append one validated request.
    ///
    /// Returns the appended record, or `None` when the target document is unknown.
    pub fn apply(&mut self, request: &ValidatedRequest) -> Option<ChangeRecord> {
        let client_id = request.client_id();

        if let Change::NewDoc { .. } = request.change() {
            self.last_doc_id += 1;
            let doc_id = DocId::new(self.last_doc_id);
            let applied = self.documents.apply(doc_id, request.change())?;
            return Some(self.log.append(doc_id, client_id, applied).clone());
        }

        let doc_id = request.doc_id()?;
        if !self.documents.contains(doc_id) {
            return None;
        }
        let transformed = transform_change(
            &self.log,
            request.change(),
            doc_id,
            request.last_seen(),
            client_id,
        );
        let applied = self.documents.apply(doc_id, &transformed)?;
        Some(self.log.append(doc_id, client_id, applied).clone())
    }
}

/// Server-side request handler.
pub struct Reconciler {
    config: Config,
    model: RwLock<ServerModel>,
    next_client_id: AtomicU64,
    metrics: ServerMetrics,
    started: Instant,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .field("clients", &self.clients_connected())
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Create a reconciler with an empty document store and log.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            model: RwLock::new(ServerModel::default()),
            next_client_id: AtomicU64::new(1),
            metrics: ServerMetrics::default(),
            started: Instant::now(),
        }
    }

    /// Time since this reconciler was created.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get access to the operational metrics.
    pub fn metrics(&self) -> &ServerMetrics {
        &self.metrics
    }

    /// Hand out the next client id (1, 2, 3, ...).
    pub fn connect(&self) -> ClientId {
        let client_id = ClientId::new(self.next_client_id.fetch_add(1, Ordering::SeqCst));
        self.metrics.connects_total.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Client connected: {:?}", client_id);
        client_id
    }

    /// Number of client ids handed out so far.
    pub fn clients_connected(&self) -> u64 {
        self.next_client_id.load(Ordering::SeqCst) - 1
    }

    /// Validate and apply one change request.
    pub async fn post(&self, request: &ChangeRequest) -> PostOutcome {
        self.metrics.posts_total.fetch_add(1, Ordering::Relaxed);

        let validated = match request.validate() {
            Ok(validated) => validated,
            Err(e) => {
                self.metrics.posts_rejected.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Rejected change request: {}", e);
                return PostOutcome::Rejected(e);
            }
        };

        let mut model = self.model.write().await;
        match model.apply(&validated) {
            Some(record) => {
                tracing::debug!(
                    "Applied {} from {:?} to {:?} as {:?}",
                    record.operation_type(),
                    record.client_id,
                    record.doc_id,
                    record.version_id
                );
                PostOutcome::Applied(record)
            }
            None => {
                self.metrics.posts_ignored.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    "Ignored {} for unknown document {:?}",
                    validated.change().operation_type(),
                    validated.doc_id()
                );
                PostOutcome::Ignored
            }
        }
    }

    /// Records with a version greater than `since`.
    pub async fn get(&self, since: VersionId) -> Vec<ChangeRecord> {
        let model = self.model.read().await;
        let records = model.log.since(since).to_vec();
        self.metrics.polls_total.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .records_served
            .fetch_add(records.len() as u64, Ordering::Relaxed);
        records
    }

    /// Answer one protocol request.
    ///
    /// `route` names the endpoint the message arrived on, for error reporting.
    pub async fn handle(&self, route: &'static str, message: Message) -> Result<Message> {
        match message {
            Message::Connect(_) => Ok(Message::ConnectResponse(ConnectResponse {
                client_id: self.connect(),
            })),
            Message::Post(Post { request }) => Ok(Message::PostResponse(PostResponse {
                result: self.post(&request).await.result(),
            })),
            Message::Get(Get { version_id }) => Ok(Message::GetResponse(GetResponse {
                records: self.get(version_id).await,
            })),
            other => Err(ServerError::UnexpectedMessage {
                route,
                actual: other.kind(),
            }),
        }
    }

    /// Snapshot of one document.
    pub async fn document(&self, doc_id: DocId) -> Option<Document> {
        self.model.read().await.documents.get(doc_id).cloned()
    }

    /// Snapshot of every document.
    pub async fn documents(&self) -> DocumentTable {
        self.model.read().await.documents.clone()
    }

    /// Number of documents.
    pub async fn document_count(&self) -> usize {
        self.model.read().await.documents.len()
    }

    /// Version of the newest record.
    pub async fn head(&self) -> VersionId {
        self.model.read().await.log.head()
    }

    /// Document and log counts from a single read.
    pub async fn snapshot(&self) -> ModelSnapshot {
        let model = self.model.read().await;
        ModelSnapshot {
            documents: model.documents.len(),
            head: model.log.head(),
            records: model.log.len(),
        }
    }
}
