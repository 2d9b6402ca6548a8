//! # edit-core
//!
//! Pure logic for Quill (no I/O, instant tests).
//!
//! This crate implements the document model, the change log, the position
//! transformer and the client replicas without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. Replaying the same records in the same order always
//! yields the same documents, which is what lets every replica converge on
//! the server's state.
//!
//! The actual I/O (network, timers) is performed by `edit-server` and
//! `edit-client`, which own these values behind their own locks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod log;
pub mod replica;
pub mod state;
pub mod text;
pub mod transform;

pub use document::{Document, DocumentTable};
pub use log::ChangeLog;
pub use replica::{ReplayError, VerifiedModel, WorkingModel};
pub use state::{Action, ConnectionState, Event, SyncEvent};
pub use text::StyledText;
pub use transform::{transform_change, transform_position};
