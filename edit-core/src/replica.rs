//! Client-side replicas of the server's documents.
//!
//! A client keeps two copies of every document:
//!
//! - [`VerifiedModel`] is rebuilt purely by replaying the change log in
//!   version order. It only ever holds committed history.
//! - [`WorkingModel`] backs the editor. Local edits land here immediately;
//!   replayed records from other clients are mirrored into it. A periodic
//!   full resync overwrites it from the verified model, which discards any
//!   optimistic edit the server never committed.

use edit_types::{Change, ChangeRecord, ClientId, DocId, OperationType, VersionId};
use thiserror::Error;

use crate::DocumentTable;

/// A record that does not extend the replayed history by exactly one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// The record was already replayed.
    #[error("duplicate record {got} (already replayed through {last_seen})")]
    Duplicate {
        /// Newest version already replayed.
        last_seen: VersionId,
        /// Version of the offending record.
        got: VersionId,
    },

    /// One or more records between the last replayed and this one are missing.
    #[error("out-of-order record {got} (expected {expected})")]
    Gap {
        /// The only acceptable next version.
        expected: VersionId,
        /// Version of the offending record.
        got: VersionId,
    },
}

/// Replica built only from the change log.
#[derive(Debug, Clone, Default)]
pub struct VerifiedModel {
    documents: DocumentTable,
    last_seen: VersionId,
}

impl VerifiedModel {
    /// Replica with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the next record of the log.
    ///
    /// The record must carry version `last_seen + 1`. Anything else is
    /// rejected and leaves the model untouched.
    pub fn replay(&mut self, record: &ChangeRecord) -> Result<(), ReplayError> {
        let expected = self.last_seen.next();
        if record.version_id <= self.last_seen {
            return Err(ReplayError::Duplicate {
                last_seen: self.last_seen,
                got: record.version_id,
            });
        }
        if record.version_id != expected {
            return Err(ReplayError::Gap {
                expected,
                got: record.version_id,
            });
        }

        self.documents.apply(record.doc_id, &record.change);
        self.last_seen = record.version_id;
        Ok(())
    }

    /// Newest replayed version.
    pub fn last_seen(&self) -> VersionId {
        self.last_seen
    }

    /// Replayed documents.
    pub fn documents(&self) -> &DocumentTable {
        &self.documents
    }
}

/// Replica backing the live editor.
#[derive(Debug, Clone, Default)]
pub struct WorkingModel {
    documents: DocumentTable,
    as_of: VersionId,
}

impl WorkingModel {
    /// Empty working model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a local edit immediately.
    ///
    /// Returns the edit as applied (clamped to the local text) together with
    /// the version it was made against, or `None` when the document is not
    /// known locally. NewDoc is never applied locally: the document only
    /// exists once the server assigns its id.
    pub fn apply_local(&mut self, doc_id: DocId, change: &Change) -> Option<(Change, VersionId)> {
        if change.operation_type() == OperationType::NewDoc {
            return None;
        }
        let applied = self.documents.apply(doc_id, change)?;
        Some((applied, self.as_of))
    }

    /// Mirror a record the verified model just replayed.
    ///
    /// Another client's edit is applied. Our own edits are skipped because
    /// they were applied locally when made, except NewDoc, which was not.
    pub fn mirror(&mut self, record: &ChangeRecord, own: Option<ClientId>) {
        let is_own = own == Some(record.client_id);
        if !is_own || record.operation_type() == OperationType::NewDoc {
            self.documents.apply(record.doc_id, &record.change);
        }
        if record.version_id > self.as_of {
            self.as_of = record.version_id;
        }
    }

    /// Full resync: replace every document with the verified copy.
    pub fn overwrite_from(&mut self, verified: &VerifiedModel) {
        self.documents = verified.documents().clone();
        self.as_of = verified.last_seen();
    }

    /// Newest log version reflected in this model.
    pub fn as_of(&self) -> VersionId {
        self.as_of
    }

    /// Working documents.
    pub fn documents(&self) -> &DocumentTable {
        &self.documents
    }
}
