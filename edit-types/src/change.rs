//! Edits and the records the change log stores for them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ClientId, DocId, VersionId};

/// Kind of edit carried by a request or record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    /// Create an empty document.
    NewDoc,
    /// Insert styled text.
    Insert,
    /// Remove a run of characters.
    Delete,
    /// Toggle one style flag over a run of characters.
    StyleChange,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewDoc => "NewDoc",
            Self::Insert => "Insert",
            Self::Delete => "Delete",
            Self::StyleChange => "StyleChange",
        };
        f.write_str(name)
    }
}

/// One of the three character style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleType {
    /// Bold weight.
    Bold,
    /// Italic slant.
    Italic,
    /// Underline decoration.
    Underline,
}

/// Style flags attached to a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CharStyle {
    /// Bold flag.
    pub bold: bool,
    /// Italic flag.
    pub italic: bool,
    /// Underline flag.
    pub underline: bool,
}

impl CharStyle {
    /// Unstyled text.
    pub const PLAIN: CharStyle = CharStyle {
        bold: false,
        italic: false,
        underline: false,
    };

    /// Build a style from the three flags.
    pub fn new(bold: bool, italic: bool, underline: bool) -> Self {
        Self {
            bold,
            italic,
            underline,
        }
    }

    /// Whether the given flag is set.
    pub fn has(&self, style: StyleType) -> bool {
        match style {
            StyleType::Bold => self.bold,
            StyleType::Italic => self.italic,
            StyleType::Underline => self.underline,
        }
    }

    /// Copy of this style with one flag set or cleared.
    pub fn with(mut self, style: StyleType, enabled: bool) -> Self {
        match style {
            StyleType::Bold => self.bold = enabled,
            StyleType::Italic => self.italic = enabled,
            StyleType::Underline => self.underline = enabled,
        }
        self
    }
}

/// A well-formed edit. Positions and counts are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Change {
    /// Create a document with the given title.
    NewDoc {
        /// Document title.
        title: String,
    },
    /// Insert `text` before the character at `position`.
    Insert {
        /// Insertion point.
        position: usize,
        /// Inserted text.
        text: String,
        /// Style applied to every inserted character.
        style: CharStyle,
    },
    /// Remove `num_chars` characters starting at `position`.
    Delete {
        /// First removed character.
        position: usize,
        /// Number of characters removed.
        num_chars: usize,
    },
    /// Set or clear `style_type` on `num_chars` characters starting at `position`.
    StyleChange {
        /// Flag being toggled.
        style_type: StyleType,
        /// `true` sets the flag, `false` clears it.
        is_enabling: bool,
        /// First affected character.
        position: usize,
        /// Number of affected characters.
        num_chars: usize,
    },
}

impl Change {
    /// The operation this edit performs.
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::NewDoc { .. } => OperationType::NewDoc,
            Self::Insert { .. } => OperationType::Insert,
            Self::Delete { .. } => OperationType::Delete,
            Self::StyleChange { .. } => OperationType::StyleChange,
        }
    }

    /// Position the edit targets, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::NewDoc { .. } => None,
            Self::Insert { position, .. }
            | Self::Delete { position, .. }
            | Self::StyleChange { position, .. } => Some(*position),
        }
    }

    /// Copy of this edit retargeted at `new_position`. NewDoc is returned unchanged.
    pub fn at(&self, new_position: usize) -> Self {
        let mut moved = self.clone();
        match &mut moved {
            Self::NewDoc { .. } => {}
            Self::Insert { position, .. }
            | Self::Delete { position, .. }
            | Self::StyleChange { position, .. } => *position = new_position,
        }
        moved
    }
}

/// An accepted edit as stored in the change log.
///
/// For NewDoc, `doc_id` is the id the server assigned to the new document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Position of this record in the log.
    pub version_id: VersionId,
    /// Document the edit applies to.
    pub doc_id: DocId,
    /// Client that submitted the edit.
    pub client_id: ClientId,
    /// The edit, holding its final (transformed) position.
    pub change: Change,
}

impl ChangeRecord {
    /// The operation this record performs.
    pub fn operation_type(&self) -> OperationType {
        self.change.operation_type()
    }
}
