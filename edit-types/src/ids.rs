//! Identity and ordering types for Quill.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the server hands out to a client at connect time.
///
/// Assigned from a monotonic counter starting at 1. Never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(u64);

impl ClientId {
    /// Create a ClientId with the given value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this ClientId.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({})", self.0)
    }
}

/// Identifier of a document, assigned by the server when the document is created.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(u64);

impl DocId {
    /// Create a DocId with the given value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this DocId.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocId({})", self.0)
    }
}

/// Position of a record in the change log.
///
/// Assigned by the server, not by clients. The first record is version 1;
/// version 0 means "nothing seen yet".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct VersionId(u64);

impl VersionId {
    /// Create a VersionId with the given value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this VersionId.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The version before any record was appended.
    pub fn zero() -> Self {
        Self(0)
    }

    /// The version immediately after this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionId({})", self.0)
    }
}
