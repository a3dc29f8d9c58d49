//! Reviewer annotations: one item of a reviewer's edit session.
//!
//! Annotations are ephemeral input. They arrive as a batch for one image and
//! are reconciled against that image's machine detections; only the
//! resulting actions are kept as an audit trail.

use serde::{Deserialize, Serialize};

use crate::geometry::PartialBoundingBox;
use crate::types::DbId;

/// One submitted item from a reviewer's edit session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewerAnnotation {
    /// Explicit reference to the machine detection this item was derived from.
    pub detection_id: Option<DbId>,
    pub bbox: Option<PartialBoundingBox>,
    pub label: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub confidence: Option<f64>,
    pub is_user_added: bool,
    pub is_deleted: bool,
    /// Explicit edited flag set by the editor.
    pub edited: bool,
    /// Edit timestamp as sent by the editor. Its presence alone marks the
    /// item as edited, even if it does not parse as a timestamp.
    pub edited_at: Option<String>,
    pub edited_by: Option<String>,
    pub edit_reason: Option<String>,
}

impl ReviewerAnnotation {
    /// Whether the reviewer changed this item.
    pub fn is_edited(&self) -> bool {
        self.edited || self.edited_at.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}
