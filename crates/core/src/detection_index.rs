//! Lookup structure over one image's machine detection set.
//!
//! Built once per reconciliation batch and read-only afterwards, so a single
//! index can serve every annotation in the batch (and be shared across
//! threads) without synchronization.

use std::collections::HashMap;

use crate::annotation::ReviewerAnnotation;
use crate::detection::MachineDetection;
use crate::geometry::{overlap, PartialBoundingBox};
use crate::types::DbId;

/// How an annotation was tied back to its detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchMethod {
    /// The annotation named the detection id explicitly.
    Identifier,
    /// Best IoU above the acceptance threshold.
    Overlap(f64),
}

/// A detection resolved for one annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<'a> {
    pub detection: &'a MachineDetection,
    pub method: MatchMethod,
}

/// Index over a detection set, preserving the set's original order.
#[derive(Debug)]
pub struct DetectionIndex<'a> {
    detections: &'a [MachineDetection],
    by_id: HashMap<DbId, usize>,
    match_threshold: f64,
}

impl<'a> DetectionIndex<'a> {
    /// Build an index. `match_threshold` is the exclusive lower bound on IoU
    /// for geometric matches.
    ///
    /// If the set repeats an id, the first occurrence is authoritative.
    pub fn new(detections: &'a [MachineDetection], match_threshold: f64) -> Self {
        let mut by_id = HashMap::with_capacity(detections.len());
        for (position, detection) in detections.iter().enumerate() {
            by_id.entry(detection.id).or_insert(position);
        }
        Self {
            detections,
            by_id,
            match_threshold,
        }
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Exact lookup by detection id.
    pub fn get(&self, id: DbId) -> Option<&'a MachineDetection> {
        self.by_id.get(&id).map(|&position| &self.detections[position])
    }

    /// The detection with the highest IoU against `bbox`, ignoring the
    /// threshold. Ties go to the earliest detection in set order. Returns
    /// `None` for an incomplete box or when nothing overlaps at all.
    pub fn best_overlap(&self, bbox: &PartialBoundingBox) -> Option<(&'a MachineDetection, f64)> {
        let bbox = bbox.complete()?;
        let mut best: Option<(&'a MachineDetection, f64)> = None;

        for detection in self.detections {
            let score = overlap(&bbox, &detection.bbox);
            let better = match best {
                Some((_, best_score)) => score > best_score,
                None => score > 0.0,
            };
            if better {
                best = Some((detection, score));
            }
        }

        best
    }

    /// Resolve the detection an annotation refers to.
    ///
    /// 1. An explicit detection id present in the set wins regardless of
    ///    overlap.
    /// 2. Otherwise the best-overlapping detection is taken if its IoU is
    ///    strictly above the threshold.
    /// 3. Otherwise nothing.
    pub fn resolve(&self, annotation: &ReviewerAnnotation) -> Option<Resolved<'a>> {
        if let Some(detection) = annotation.detection_id.and_then(|id| self.get(id)) {
            return Some(Resolved {
                detection,
                method: MatchMethod::Identifier,
            });
        }

        let bbox = annotation.bbox.as_ref()?;
        let (detection, score) = self.best_overlap(bbox)?;
        if score > self.match_threshold {
            Some(Resolved {
                detection,
                method: MatchMethod::Overlap(score),
            })
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
