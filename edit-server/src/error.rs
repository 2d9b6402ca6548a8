//! Error types for edit-server.

use edit_types::WireError;

/// Main error type for edit-server operations.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Message encoding or decoding failed.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// A request arrived on a route that does not serve it.
    #[error("unexpected message on {route}: {actual}")]
    UnexpectedMessage {
        /// Route the message was sent to.
        route: &'static str,
        /// Kind of message received.
        actual: &'static str,
    },

    /// Configured bind address does not parse.
    #[error("invalid bind address {address}: {source}")]
    InvalidAddress {
        /// The configured address.
        address: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
