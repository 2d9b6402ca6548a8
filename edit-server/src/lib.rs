//! # edit-server
//!
//! Authoritative server for Quill collaborative editing.
//!
//! This crate implements the server that:
//! - Hands out client ids
//! - Validates change requests and transforms their positions against
//!   edits the requester has not seen
//! - Applies accepted edits to the document store and appends them to the
//!   change log, atomically
//! - Serves the change log to polling clients
//!
//! ## Architecture
//!
//! ```text
//! Client A ──┐                          ┌── Client B
//!            │   POST /connect /post    │
//!            ├─────────── /get ────────►│
//!            │                          │
//!        ┌───┴──────────────────────────┴───┐
//!        │           Reconciler             │
//!        │  ┌────────────────────────────┐  │
//!        │  │ RwLock<ServerModel>        │  │
//!        │  │   documents + change log   │  │
//!        │  └────────────────────────────┘  │
//!        └──────────────────────────────────┘
//! ```
//!
//! ## Protocol
//!
//! Bodies are MessagePack-encoded [`edit_types::Message`] values:
//! - CONNECT → CONNECT_RESPONSE (client id)
//! - POST → POST_RESPONSE (success / failure)
//! - GET → GET_RESPONSE (records after a version)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod http;
pub mod reconciler;

pub use config::{Config, ConfigError};
pub use error::{Result, ServerError};
pub use reconciler::{ModelSnapshot, PostOutcome, Reconciler, ServerMetrics, ServerModel};

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Bind the configured address and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr =
        config
            .server
            .bind_address
            .parse()
            .map_err(|e| ServerError::InvalidAddress {
                address: config.server.bind_address.clone(),
                source: e,
            })?;
    let listener = TcpListener::bind(addr).await?;
    run(listener, Arc::new(Reconciler::new(config))).await
}

/// Serve on an already bound listener.
pub async fn run(listener: TcpListener, reconciler: Arc<Reconciler>) -> Result<()> {
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, http::build_router(reconciler)).await?;
    Ok(())
}
