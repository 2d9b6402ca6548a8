//! Documents and the table that indexes them by id.
//!
//! [`DocumentTable`] is the one value type behind the server model and both
//! client replicas. Each owner decides *when* to call [`DocumentTable::apply`];
//! the table decides *what* an edit does.

use std::collections::BTreeMap;

use edit_types::{Change, DocId};

use crate::StyledText;

/// A titled piece of styled text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    title: String,
    content: StyledText,
}

impl Document {
    /// Empty document with the given title.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: StyledText::new(),
        }
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Document content.
    pub fn content(&self) -> &StyledText {
        &self.content
    }

    /// Apply a content edit, returning it with positions and counts clamped
    /// to what was actually applied. NewDoc is returned unchanged.
    pub fn apply(&mut self, change: &Change) -> Change {
        match change {
            Change::NewDoc { .. } => change.clone(),
            Change::Insert {
                position,
                text,
                style,
            } => Change::Insert {
                position: self.content.insert(*position, text, *style),
                text: text.clone(),
                style: *style,
            },
            Change::Delete {
                position,
                num_chars,
            } => {
                let (position, num_chars) = self.content.delete(*position, *num_chars);
                Change::Delete {
                    position,
                    num_chars,
                }
            }
            Change::StyleChange {
                style_type,
                is_enabling,
                position,
                num_chars,
            } => {
                let (position, num_chars) =
                    self.content
                        .restyle(*position, *num_chars, *style_type, *is_enabling);
                Change::StyleChange {
                    style_type: *style_type,
                    is_enabling: *is_enabling,
                    position,
                    num_chars,
                }
            }
        }
    }
}

/// All documents known to one model, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTable {
    documents: BTreeMap<DocId, Document>,
}

impl DocumentTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a document.
    pub fn get(&self, doc_id: DocId) -> Option<&Document> {
        self.documents.get(&doc_id)
    }

    /// Whether a document with this id exists.
    pub fn contains(&self, doc_id: DocId) -> bool {
        self.documents.contains_key(&doc_id)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the table holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in id order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.documents.iter().map(|(id, doc)| (*id, doc))
    }

    /// Apply `change` to document `doc_id`.
    ///
    /// NewDoc creates the document (an existing one with the same id is kept).
    /// Any other change against an unknown id returns `None` and changes nothing.
    /// Otherwise returns the change as applied, with clamped positions.
    pub fn apply(&mut self, doc_id: DocId, change: &Change) -> Option<Change> {
        if let Change::NewDoc { title } = change {
            self.documents
                .entry(doc_id)
                .or_insert_with(|| Document::new(title));
            return Some(change.clone());
        }

        self.documents
            .get_mut(&doc_id)
            .map(|document| document.apply(change))
    }
}
