//! # edit-client
//!
//! Client library for Quill collaborative editing.
//!
//! This is the library an editor embeds to collaborate on documents.
//!
//! ## Features
//!
//! - **Optimistic edits**: local input lands in the working model at once
//! - **Verified replica**: the change log replayed strictly in order
//! - **Self-healing**: periodic full resync bounds replica drift
//! - **Transport Abstraction**: Pluggable transport layer (HTTP, mock)
//! - **Pure State Machine**: Uses edit-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use edit_client::{ClientConfig, CollabClient, HttpTransport, SyncDriver};
//! use std::sync::Arc;
//!
//! let config = ClientConfig::default();
//! let transport = HttpTransport::new(&config.server_url)?;
//! let client = Arc::new(CollabClient::new(config, transport));
//!
//! // Connect and start polling, posting and resyncing
//! let driver = SyncDriver::start(client).await;
//! driver.create_document("Untitled").await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod driver;
pub mod transport;

pub use client::{ClientError, CollabClient};
pub use config::ClientConfig;
pub use driver::SyncDriver;
pub use transport::{Endpoint, HttpTransport, MockTransport, Transport, TransportError};
