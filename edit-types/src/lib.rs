//! # edit-types
//!
//! Wire format types for the Quill collaborative editing protocol.
//!
//! This crate provides the foundational types used across all Quill crates:
//! - [`ClientId`], [`DocId`], [`VersionId`] - Identity and ordering types
//! - [`Change`], [`ChangeRecord`] - Accepted edits as they appear in the change log
//! - [`ChangeRequest`] - Client-submitted edits, validated into a [`ValidatedRequest`]
//! - [`Message`] - Protocol messages (Connect, Post, Get and their responses)
//! - [`WireError`], [`ValidationError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod change;
mod error;
mod ids;
mod messages;
mod request;

pub use change::{Change, ChangeRecord, CharStyle, OperationType, StyleType};
pub use error::{ValidationError, WireError};
pub use ids::{ClientId, DocId, VersionId};
pub use messages::{
    Connect, ConnectResponse, Get, GetResponse, Message, Post, PostResponse, PostResult,
};
pub use request::{ChangeRequest, RequestPayload, ValidatedRequest};
