//! # Edit Events
//!
//! Changes observed on a live tree, addressed by [`StableId`]. Events are
//! the only way edits reach the canonical tree.

use serde::{Deserialize, Serialize};

use crate::ids::StableId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EditEvent {
    /// An image attribute changed; `None` means it was removed
    AttributeChanged {
        id: StableId,
        name: String,
        value: Option<String>,
    },

    /// Text changed inside a tagged element; carries the element's full
    /// inner markup
    TextReplaced { id: StableId, html: String },

    /// Nodes were inserted under a tagged element; carries the text of each
    /// inserted node
    ChildrenReplaced { id: StableId, texts: Vec<String> },
}

impl EditEvent {
    pub fn id(&self) -> &StableId {
        match self {
            EditEvent::AttributeChanged { id, .. }
            | EditEvent::TextReplaced { id, .. }
            | EditEvent::ChildrenReplaced { id, .. } => id,
        }
    }
}

/// Events observed between two flushes, earliest first
pub type EditBatch = Vec<EditEvent>;
