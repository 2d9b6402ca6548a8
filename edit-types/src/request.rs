//! Client-submitted change requests and their validation.
//!
//! Requests arrive with every field optional, mirroring what a client may
//! actually send. [`ChangeRequest::validate`] checks the fields the declared
//! operation needs and produces a [`ValidatedRequest`] the server can apply
//! without further checks.

use serde::{Deserialize, Serialize};

use crate::{
    Change, CharStyle, ClientId, DocId, OperationType, StyleType, ValidationError, VersionId,
};

/// Operation-specific request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RequestPayload {
    /// Body of a NewDoc request.
    NewDoc {
        /// Document title.
        title: Option<String>,
    },
    /// Body of an Insert request.
    Insert {
        /// Insertion point (pre-transform).
        position: Option<usize>,
        /// Inserted text.
        text: Option<String>,
        /// Bold flag (defaults to false).
        is_bold: Option<bool>,
        /// Italic flag (defaults to false).
        is_italic: Option<bool>,
        /// Underline flag (defaults to false).
        is_underline: Option<bool>,
    },
    /// Body of a Delete request.
    Delete {
        /// First removed character (pre-transform).
        position: Option<usize>,
        /// Number of characters removed.
        num_chars: Option<usize>,
    },
    /// Body of a StyleChange request.
    StyleChange {
        /// Flag being toggled.
        style_type: Option<StyleType>,
        /// Whether the flag is set or cleared.
        is_enabling: Option<bool>,
        /// First affected character.
        position: Option<usize>,
        /// Number of affected characters.
        num_chars: Option<usize>,
    },
}

impl RequestPayload {
    fn operation_type(&self) -> OperationType {
        match self {
            Self::NewDoc { .. } => OperationType::NewDoc,
            Self::Insert { .. } => OperationType::Insert,
            Self::Delete { .. } => OperationType::Delete,
            Self::StyleChange { .. } => OperationType::StyleChange,
        }
    }
}

impl From<&Change> for RequestPayload {
    fn from(change: &Change) -> Self {
        match change.clone() {
            Change::NewDoc { title } => Self::NewDoc { title: Some(title) },
            Change::Insert {
                position,
                text,
                style,
            } => Self::Insert {
                position: Some(position),
                text: Some(text),
                is_bold: Some(style.bold),
                is_italic: Some(style.italic),
                is_underline: Some(style.underline),
            },
            Change::Delete {
                position,
                num_chars,
            } => Self::Delete {
                position: Some(position),
                num_chars: Some(num_chars),
            },
            Change::StyleChange {
                style_type,
                is_enabling,
                position,
                num_chars,
            } => Self::StyleChange {
                style_type: Some(style_type),
                is_enabling: Some(is_enabling),
                position: Some(position),
                num_chars: Some(num_chars),
            },
        }
    }
}

/// An edit submitted by a client, as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    /// Declared operation.
    pub operation_type: Option<OperationType>,
    /// Target document (absent for NewDoc).
    pub doc_id: Option<DocId>,
    /// Submitting client.
    pub client_id: Option<ClientId>,
    /// Last log version the client had absorbed when it made the edit.
    pub version_id: Option<VersionId>,
    /// Operation-specific body.
    pub payload: Option<RequestPayload>,
}

impl ChangeRequest {
    /// Build a complete request for a local edit.
    ///
    /// `doc_id` is ignored for NewDoc, which never targets an existing document.
    pub fn from_change(
        doc_id: Option<DocId>,
        client_id: ClientId,
        last_seen: VersionId,
        change: &Change,
    ) -> Self {
        let operation_type = change.operation_type();
        let doc_id = match operation_type {
            OperationType::NewDoc => None,
            _ => doc_id,
        };
        Self {
            operation_type: Some(operation_type),
            doc_id,
            client_id: Some(client_id),
            version_id: Some(last_seen),
            payload: Some(RequestPayload::from(change)),
        }
    }

    /// Check that every field the declared operation needs is present.
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let operation = self
            .operation_type
            .ok_or(ValidationError::MissingOperation)?;
        let missing = |field| ValidationError::MissingField { operation, field };

        let client_id = self.client_id.ok_or_else(|| missing("client_id"))?;
        let last_seen = self.version_id.ok_or_else(|| missing("version_id"))?;
        let payload = self.payload.as_ref().ok_or_else(|| missing("payload"))?;

        if payload.operation_type() != operation {
            return Err(ValidationError::MismatchedPayload {
                operation,
                payload: payload.operation_type(),
            });
        }

        let doc_id = match operation {
            OperationType::NewDoc => None,
            _ => Some(self.doc_id.ok_or_else(|| missing("doc_id"))?),
        };

        let change = match payload {
            RequestPayload::NewDoc { title } => Change::NewDoc {
                title: title.clone().ok_or_else(|| missing("title"))?,
            },
            RequestPayload::Insert {
                position,
                text,
                is_bold,
                is_italic,
                is_underline,
            } => Change::Insert {
                position: position.ok_or_else(|| missing("position"))?,
                text: text.clone().ok_or_else(|| missing("text"))?,
                style: CharStyle::new(
                    is_bold.unwrap_or(false),
                    is_italic.unwrap_or(false),
                    is_underline.unwrap_or(false),
                ),
            },
            RequestPayload::Delete {
                position,
                num_chars,
            } => Change::Delete {
                position: position.ok_or_else(|| missing("position"))?,
                num_chars: num_chars.ok_or_else(|| missing("num_chars"))?,
            },
            RequestPayload::StyleChange {
                style_type,
                is_enabling,
                position,
                num_chars,
            } => Change::StyleChange {
                style_type: style_type.ok_or_else(|| missing("style_type"))?,
                is_enabling: is_enabling.ok_or_else(|| missing("is_enabling"))?,
                position: position.ok_or_else(|| missing("position"))?,
                num_chars: num_chars.ok_or_else(|| missing("num_chars"))?,
            },
        };

        Ok(ValidatedRequest {
            doc_id,
            client_id,
            last_seen,
            change,
        })
    }
}

/// A request whose fields have been checked.
///
/// `doc_id()` is `None` exactly when the change is a NewDoc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    doc_id: Option<DocId>,
    client_id: ClientId,
    last_seen: VersionId,
    change: Change,
}

impl ValidatedRequest {
    /// Target document, `None` for NewDoc.
    pub fn doc_id(&self) -> Option<DocId> {
        self.doc_id
    }

    /// Submitting client.
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Last version the client had absorbed.
    pub fn last_seen(&self) -> VersionId {
        self.last_seen
    }

    /// The requested edit, at its pre-transform position.
    pub fn change(&self) -> &Change {
        &self.change
    }
}
