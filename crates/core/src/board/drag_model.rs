//! Drag gesture events as delivered by the UI layer.

use serde::{Deserialize, Serialize};

use crate::candidates::{CandidateId, Stage};
use crate::errors::Result;

/// Column and slot a card is hovering over or dropped on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    /// Column identifier as rendered; expected to be a stage name.
    pub droppable_id: String,
    pub index: u32,
}

impl DropTarget {
    pub fn new(droppable_id: impl Into<String>, index: u32) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }

    /// Parses the column identifier into a stage.
    pub fn stage(&self) -> Result<Stage> {
        self.droppable_id.parse()
    }
}

/// Drag-progress notification carrying the tentative target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragUpdate {
    pub draggable_id: CandidateId,
    /// `None` while the card hovers outside every column.
    pub destination: Option<DropTarget>,
}

/// Terminal event of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropResult {
    pub draggable_id: CandidateId,
    /// `None` when the drop was cancelled.
    pub destination: Option<DropTarget>,
}
