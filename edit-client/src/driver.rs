//! Sync protocol driver: the background loops that keep a client in sync.
//!
//! Once connected, three tasks run until [`SyncDriver::shutdown`]:
//!
//! - **poll**: every `poll_interval`, fetch and replay new records. A replay
//!   error stops this loop (the verified model can no longer be trusted);
//!   transport errors are logged and the next tick tries again.
//! - **post**: drains the outbox in order, one request at a time. A request
//!   that fails in transit is logged and dropped, never retried. The
//!   periodic resync is what eventually removes its optimistic effect.
//! - **resync**: every `resync_interval`, overwrite the working model from
//!   the verified model.

use std::sync::Arc;

use edit_types::{Change, ChangeRequest, DocId};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::client::{ClientError, CollabClient};
use crate::transport::Transport;

/// Handle to a connected client and its running sync loops.
pub struct SyncDriver<T: Transport + 'static> {
    client: Arc<CollabClient<T>>,
    outbox: mpsc::Sender<ChangeRequest>,
    shutdown: watch::Sender<bool>,
    poll_task: JoinHandle<Result<(), ClientError>>,
    post_task: JoinHandle<()>,
    resync_task: JoinHandle<()>,
}

impl<T: Transport + 'static> SyncDriver<T> {
    /// Connect (retrying indefinitely) and start the sync loops.
    pub async fn start(client: Arc<CollabClient<T>>) -> Self {
        let client_id = client.connect_with_retry().await;
        tracing::info!("Starting sync loops for client {}", client_id);

        let (outbox, outbox_rx) = mpsc::channel(client.config().outbox_capacity.max(1));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let poll_task = tokio::spawn(poll_loop(Arc::clone(&client), shutdown_rx.clone()));
        let post_task = tokio::spawn(post_loop(Arc::clone(&client), outbox_rx));
        let resync_task = tokio::spawn(resync_loop(Arc::clone(&client), shutdown_rx));

        Self {
            client,
            outbox,
            shutdown,
            poll_task,
            post_task,
            resync_task,
        }
    }

    /// The driven client.
    pub fn client(&self) -> &Arc<CollabClient<T>> {
        &self.client
    }

    /// Apply a local edit now and queue it for posting.
    pub async fn edit(&self, doc_id: DocId, change: &Change) -> Result<(), ClientError> {
        let request = self.client.edit(doc_id, change).await?;
        self.enqueue(request).await;
        Ok(())
    }

    /// Queue a request for a new document.
    pub async fn create_document(&self, title: &str) -> Result<(), ClientError> {
        let request = self.client.new_document(title).await?;
        self.enqueue(request).await;
        Ok(())
    }

    async fn enqueue(&self, request: ChangeRequest) {
        if self.outbox.send(request).await.is_err() {
            tracing::warn!("Post loop has stopped; edit not sent");
        }
    }

    /// Whether the poll loop has stopped (only after a fatal replay error
    /// or shutdown).
    pub fn poll_stopped(&self) -> bool {
        self.poll_task.is_finished()
    }

    /// Flush queued posts, stop every loop and report a fatal poll error or
    /// a panicked loop, if any.
    pub async fn shutdown(self) -> Result<(), ClientError> {
        drop(self.outbox);
        let post = self.post_task.await;

        let _ = self.shutdown.send(true);
        let resync = self.resync_task.await;
        let poll = self.poll_task.await;

        let poll = poll.map_err(|e| task_failed("poll", e))?;
        post.map_err(|e| task_failed("post", e))?;
        resync.map_err(|e| task_failed("resync", e))?;
        poll
    }
}

fn task_failed(name: &str, error: tokio::task::JoinError) -> ClientError {
    tracing::error!("{} task failed: {}", name, error);
    ClientError::TaskFailed(format!("{} loop: {}", name, error))
}

async fn poll_loop<T: Transport>(
    client: Arc<CollabClient<T>>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), ClientError> {
    let mut ticker = interval(client.config().poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => return Ok(()),
        }

        match client.poll().await {
            Ok(0) => {}
            Ok(n) => tracing::debug!("Replayed {} records", n),
            Err(e) if e.is_fatal() => {
                tracing::error!("Stopping poll loop: {}", e);
                return Err(e);
            }
            Err(e) => tracing::warn!("Poll failed: {}", e),
        }
    }
}

async fn post_loop<T: Transport>(
    client: Arc<CollabClient<T>>,
    mut outbox: mpsc::Receiver<ChangeRequest>,
) {
    while let Some(request) = outbox.recv().await {
        // Failures are logged and published by the client; the edit is dropped.
        let _ = client.post(request).await;
    }
}

async fn resync_loop<T: Transport>(
    client: Arc<CollabClient<T>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(client.config().resync_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it so a fresh client is not
    // resynced before it has polled anything.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => client.resync().await,
            _ = shutdown.changed() => return,
        }
    }
}
