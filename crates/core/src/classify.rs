//! Action classifier.
//!
//! Decides what a reviewer annotation means relative to its resolved machine
//! detection, then builds the audit record for that decision.
//!
//! | user added | deleted | matched | edited | disposition |
//! |------------|---------|---------|--------|-------------|
//! | yes        | -       | -       | -      | Added       |
//! | no         | yes     | yes     | -      | Deleted     |
//! | no         | yes     | no      | -      | no action   |
//! | no         | no      | yes     | yes    | Edited      |
//! | no         | no      | yes     | no     | Confirmed   |
//! | no         | no      | no      | -      | no action   |

use serde::Serialize;

use crate::action::{ActionFields, ActionType, AnnotationAction};
use crate::annotation::ReviewerAnnotation;
use crate::detection::MachineDetection;
use crate::policy::ReconcilePolicy;
use crate::types::Timestamp;

/// Why an annotation produced no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Marked deleted, but there is no detection to delete.
    UnmatchedDelete,
    /// Neither added nor deleted, and no detection could be resolved.
    Unmatched,
}

/// Outcome of classifying one annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Disposition<'a> {
    Added,
    Edited(&'a MachineDetection),
    Deleted(&'a MachineDetection),
    Confirmed(&'a MachineDetection),
    NoAction(SkipReason),
}

impl Disposition<'_> {
    pub fn action_type(&self) -> Option<ActionType> {
        match self {
            Self::Added => Some(ActionType::Added),
            Self::Edited(_) => Some(ActionType::Edited),
            Self::Deleted(_) => Some(ActionType::Deleted),
            Self::Confirmed(_) => Some(ActionType::Confirmed),
            Self::NoAction(_) => None,
        }
    }
}

/// Classify an annotation given the detection it resolved to, if any.
pub fn classify<'a>(
    annotation: &ReviewerAnnotation,
    matched: Option<&'a MachineDetection>,
) -> Disposition<'a> {
    match (annotation.is_user_added, annotation.is_deleted, matched) {
        (true, _, _) => Disposition::Added,
        (false, true, Some(detection)) => Disposition::Deleted(detection),
        (false, true, None) => Disposition::NoAction(SkipReason::UnmatchedDelete),
        (false, false, Some(detection)) if annotation.is_edited() => {
            Disposition::Edited(detection)
        }
        (false, false, Some(detection)) => Disposition::Confirmed(detection),
        (false, false, None) => Disposition::NoAction(SkipReason::Unmatched),
    }
}

/// Build the audit record for a disposition.
///
/// Returns `None` for [`Disposition::NoAction`].
pub fn build_action(
    annotation: &ReviewerAnnotation,
    disposition: Disposition<'_>,
    policy: &ReconcilePolicy,
    now: Timestamp,
) -> Option<AnnotationAction> {
    let (action_type, detection_id, original, new) = match disposition {
        Disposition::Added => (
            ActionType::Added,
            None,
            None,
            Some(added_fields(annotation, policy)),
        ),
        Disposition::Edited(detection) => (
            ActionType::Edited,
            Some(detection.id),
            Some(ActionFields::from_detection(detection)),
            Some(edited_fields(annotation, detection, policy)),
        ),
        Disposition::Deleted(detection) => (
            ActionType::Deleted,
            Some(detection.id),
            Some(ActionFields::from_detection(detection)),
            None,
        ),
        Disposition::Confirmed(detection) => (
            ActionType::Confirmed,
            Some(detection.id),
            Some(ActionFields::from_detection(detection)),
            None,
        ),
        Disposition::NoAction(_) => return None,
    };

    Some(AnnotationAction {
        action_type,
        detection_id,
        original,
        new,
        created_at: now,
    })
}

/// New-side fields of a manual addition: what the reviewer drew, with the
/// confidence always forced to the manual value.
fn added_fields(annotation: &ReviewerAnnotation, policy: &ReconcilePolicy) -> ActionFields {
    ActionFields {
        label: annotation.label.clone(),
        category: annotation.category.clone(),
        severity: annotation.severity.clone(),
        confidence: Some(policy.manual_confidence),
        bbox: annotation.bbox.unwrap_or_default(),
    }
}

/// New-side fields of an edit. Each field falls back to the detection's
/// value on its own; box coordinates fall back one by one.
fn edited_fields(
    annotation: &ReviewerAnnotation,
    detection: &MachineDetection,
    policy: &ReconcilePolicy,
) -> ActionFields {
    let bbox = annotation
        .bbox
        .map(|b| b.or_fill(&detection.bbox))
        .unwrap_or(detection.bbox);

    ActionFields {
        label: Some(
            annotation
                .label
                .clone()
                .unwrap_or_else(|| detection.label.clone()),
        ),
        category: Some(
            annotation
                .category
                .clone()
                .unwrap_or_else(|| detection.category.clone()),
        ),
        severity: Some(
            annotation
                .severity
                .clone()
                .unwrap_or_else(|| detection.severity.clone()),
        ),
        confidence: Some(annotation.confidence.unwrap_or(policy.manual_confidence)),
        bbox: bbox.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
