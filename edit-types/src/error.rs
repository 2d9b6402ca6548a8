//! Error types for Quill wire handling.

use crate::OperationType;
use thiserror::Error;

/// Errors raised while encoding or decoding protocol messages.
#[derive(Debug, Error)]
pub enum WireError {
    /// MessagePack serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] rmp_serde::encode::Error),

    /// MessagePack deserialization failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] rmp_serde::decode::Error),

    /// A message arrived where a different one was expected
    #[error("unexpected message: expected {expected}, got {actual}")]
    UnexpectedMessage {
        /// Message the caller was waiting for.
        expected: &'static str,
        /// Message that actually arrived.
        actual: &'static str,
    },
}

/// A change request that does not carry the fields its operation needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The request does not say which operation it performs.
    #[error("request is missing its operation type")]
    MissingOperation,

    /// A required field is absent.
    #[error("{operation} request is missing `{field}`")]
    MissingField {
        /// Declared operation of the request.
        operation: OperationType,
        /// Name of the absent field.
        field: &'static str,
    },

    /// The payload variant disagrees with the declared operation.
    #[error("{operation} request carries a {payload} payload")]
    MismatchedPayload {
        /// Declared operation of the request.
        operation: OperationType,
        /// Operation the payload belongs to.
        payload: OperationType,
    },
}
