//! Annotation actions: the append-only audit trail of reviewer decisions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detection::MachineDetection;
use crate::error::CoreError;
use crate::geometry::PartialBoundingBox;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Action type
// ---------------------------------------------------------------------------

/// How a reviewer annotation relates to the machine detection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// The reviewer drew a box the analyzer did not produce.
    Added,
    /// The reviewer changed a machine detection.
    Edited,
    /// The reviewer rejected a machine detection.
    Deleted,
    /// The reviewer accepted a machine detection unchanged.
    Confirmed,
}

/// All valid action type strings, in declaration order.
pub const VALID_ACTION_TYPES: &[&str] = &["ADDED", "EDITED", "DELETED", "CONFIRMED"];

impl ActionType {
    pub const ALL: [ActionType; 4] = [Self::Added, Self::Edited, Self::Deleted, Self::Confirmed];

    /// Return the action type as stored in `annotation_actions.action_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "ADDED",
            Self::Edited => "EDITED",
            Self::Deleted => "DELETED",
            Self::Confirmed => "CONFIRMED",
        }
    }

    /// Parse an action type from its stored form.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "ADDED" => Ok(Self::Added),
            "EDITED" => Ok(Self::Edited),
            "DELETED" => Ok(Self::Deleted),
            "CONFIRMED" => Ok(Self::Confirmed),
            _ => Err(CoreError::Validation(format!(
                "Invalid action type '{s}'. Must be one of: {}",
                VALID_ACTION_TYPES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action fields
// ---------------------------------------------------------------------------

/// One side (original or new) of an action record.
///
/// Every field is individually nullable: an ADDED action copies whatever the
/// reviewer submitted, which may be incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionFields {
    pub label: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub confidence: Option<f64>,
    pub bbox: PartialBoundingBox,
}

impl ActionFields {
    /// Snapshot every field of a machine detection.
    pub fn from_detection(detection: &MachineDetection) -> Self {
        Self {
            label: Some(detection.label.clone()),
            category: Some(detection.category.clone()),
            severity: Some(detection.severity.clone()),
            confidence: Some(detection.confidence),
            bbox: detection.bbox.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.category.is_none()
            && self.severity.is_none()
            && self.confidence.is_none()
            && self.bbox.is_empty()
    }
}

// ---------------------------------------------------------------------------
// AnnotationAction
// ---------------------------------------------------------------------------

/// Immutable audit record for one reconciled reviewer annotation.
///
/// - ADDED: no detection, no original side, new side from the annotation.
/// - EDITED: detection and both sides.
/// - DELETED / CONFIRMED: detection and original side only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationAction {
    pub action_type: ActionType,
    pub detection_id: Option<DbId>,
    pub original: Option<ActionFields>,
    pub new: Option<ActionFields>,
    pub created_at: Timestamp,
}

impl AnnotationAction {
    /// Check the shape invariants listed on the type.
    pub fn check_shape(&self) -> Result<(), CoreError> {
        let has_original = self.original.as_ref().is_some_and(|o| !o.is_empty());
        let has_new = self.new.as_ref().is_some_and(|n| !n.is_empty());

        let ok = match self.action_type {
            ActionType::Added => self.detection_id.is_none() && !has_original && has_new,
            ActionType::Edited => self.detection_id.is_some() && has_original && has_new,
            ActionType::Deleted | ActionType::Confirmed => {
                self.detection_id.is_some() && has_original && self.new.is_none()
            }
        };

        if ok {
            Ok(())
        } else {
            Err(CoreError::Internal(format!(
                "{} action has an inconsistent field layout",
                self.action_type
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// Number of actions per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionCounts {
    pub added: i64,
    pub edited: i64,
    pub deleted: i64,
    pub confirmed: i64,
}

impl ActionCounts {
    pub fn add(&mut self, action_type: ActionType, n: i64) {
        match action_type {
            ActionType::Added => self.added += n,
            ActionType::Edited => self.edited += n,
            ActionType::Deleted => self.deleted += n,
            ActionType::Confirmed => self.confirmed += n,
        }
    }

    pub fn total(&self) -> i64 {
        self.added + self.edited + self.deleted + self.confirmed
    }
}

impl<'a> FromIterator<&'a AnnotationAction> for ActionCounts {
    fn from_iter<I: IntoIterator<Item = &'a AnnotationAction>>(iter: I) -> Self {
        let mut counts = Self::default();
        for action in iter {
            counts.add(action.action_type, 1);
        }
        counts
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
