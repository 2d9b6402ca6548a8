//! Transport abstraction for Quill.
//!
//! This module provides a pluggable transport layer that abstracts
//! the underlying request mechanism (HTTP, mock for testing, or an
//! in-process loopback).
//!
//! # Design
//!
//! The protocol is request/response. A transport takes an encoded
//! [`Message`](edit_types::Message) addressed to one [`Endpoint`] and
//! returns the encoded reply. It knows nothing about message contents.
//!
//! # Example
//!
//! ```ignore
//! let transport = HttpTransport::new("http://127.0.0.1:4444")?;
//! let reply = transport.request(Endpoint::Connect, bytes).await?;
//! ```

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not reach the server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request was sent but did not complete.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Server answered with an error status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// No response available.
    #[error("no response")]
    NoResponse,
}

/// Protocol endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Obtain a client id.
    Connect,
    /// Submit a change request.
    Post,
    /// Fetch change records after a version.
    Get,
}

impl Endpoint {
    /// URL path of this endpoint.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Connect => "/connect",
            Self::Post => "/post",
            Self::Get => "/get",
        }
    }
}

/// Transport trait for exchanging protocol messages with the server.
///
/// Implementations handle the underlying request mechanism
/// (HTTP, loopback, mock, etc).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an encoded request to `endpoint` and return the encoded reply.
    async fn request(&self, endpoint: Endpoint, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}
