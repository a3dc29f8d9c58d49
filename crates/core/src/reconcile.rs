//! Reconciliation orchestrator.
//!
//! Walks a reviewer's annotation batch in submitted order, resolves each
//! annotation against the image's detection set, classifies it, and collects
//! the resulting actions. The batch is returned whole; persisting it
//! atomically is the caller's job.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use crate::action::{ActionCounts, AnnotationAction};
use crate::annotation::ReviewerAnnotation;
use crate::classify::{build_action, classify, Disposition, SkipReason};
use crate::detection::MachineDetection;
use crate::detection_index::DetectionIndex;
use crate::error::CoreError;
use crate::policy::ReconcilePolicy;
use crate::types::{ImageId, Timestamp};

/// Entity name reported when an image has no analysis to reconcile against.
pub const ANALYSIS_RESULT_ENTITY: &str = "AnalysisResult";

// ---------------------------------------------------------------------------
// Detection source
// ---------------------------------------------------------------------------

/// Supplies the current detection set of an image.
///
/// The returned order must be stable: it is the tie-break order for
/// geometric matching.
#[async_trait]
pub trait DetectionSource: Send + Sync {
    /// `Ok(None)` when the image has never been analyzed.
    async fn load_detections(
        &self,
        image_id: ImageId,
    ) -> Result<Option<Vec<MachineDetection>>, CoreError>;
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// An annotation that produced no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedAnnotation {
    /// Zero-based position in the submitted batch.
    pub position: usize,
    pub reason: SkipReason,
}

/// Result of reconciling one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub image_id: ImageId,
    /// Actions in submitted annotation order.
    pub actions: Vec<AnnotationAction>,
    pub skipped: Vec<SkippedAnnotation>,
}

impl ReconcileReport {
    pub fn counts(&self) -> ActionCounts {
        self.actions.iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Reconcile a batch against an already-loaded detection set.
///
/// `detections` is `None` when the image has no analysis result; that is
/// reported as [`CoreError::NotFound`], never as an empty batch.
pub fn reconcile(
    image_id: ImageId,
    detections: Option<&[MachineDetection]>,
    annotations: &[ReviewerAnnotation],
    policy: &ReconcilePolicy,
    now: Timestamp,
) -> Result<ReconcileReport, CoreError> {
    let detections = detections.ok_or(CoreError::NotFound {
        entity: ANALYSIS_RESULT_ENTITY,
        id: image_id,
    })?;

    let index = DetectionIndex::new(detections, policy.match_threshold);
    let mut actions = Vec::with_capacity(annotations.len());
    let mut skipped = Vec::new();

    for (position, annotation) in annotations.iter().enumerate() {
        let matched = index.resolve(annotation).map(|r| r.detection);
        let disposition = classify(annotation, matched);

        if let Disposition::NoAction(reason) = disposition {
            skipped.push(SkippedAnnotation { position, reason });
            continue;
        }

        if let Some(action) = build_action(annotation, disposition, policy, now) {
            action.check_shape()?;
            actions.push(action);
        }
    }

    Ok(ReconcileReport {
        image_id,
        actions,
        skipped,
    })
}

/// Load the detection snapshot from `source` and reconcile against it.
pub async fn reconcile_from_source<S>(
    source: &S,
    image_id: ImageId,
    annotations: &[ReviewerAnnotation],
    policy: &ReconcilePolicy,
) -> Result<ReconcileReport, CoreError>
where
    S: DetectionSource + ?Sized,
{
    let detections = source.load_detections(image_id).await?;
    reconcile(
        image_id,
        detections.as_deref(),
        annotations,
        policy,
        Utc::now(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
