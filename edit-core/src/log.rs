//! The append-only change log.
//!
//! Record `i` (zero-based) always has version `i + 1`, so the log is its own
//! index: looking up everything after a version is a slice.

use edit_types::{Change, ChangeRecord, ClientId, DocId, VersionId};

/// Totally ordered history of accepted edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
}

impl ChangeLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an accepted edit and return the record with its assigned version.
    pub fn append(&mut self, doc_id: DocId, client_id: ClientId, change: Change) -> &ChangeRecord {
        let version_id = self.head().next();
        self.records.push(ChangeRecord {
            version_id,
            doc_id,
            client_id,
            change,
        });
        &self.records[self.records.len() - 1]
    }

    /// Records with a version greater than `since`, in version order.
    ///
    /// A version at or beyond the head yields an empty slice.
    pub fn since(&self, since: VersionId) -> &[ChangeRecord] {
        let start = usize::try_from(since.value())
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    /// Version of the newest record, or zero for an empty log.
    pub fn head(&self) -> VersionId {
        self.records
            .last()
            .map(|record| record.version_id)
            .unwrap_or_else(VersionId::zero)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
