//! Tunable reconciliation policy.
//!
//! The match threshold and the confidence assigned to manual additions and
//! edits are policy values, not physical constants. Deployments override
//! them through configuration; the defaults reproduce the behaviour the
//! review tool has always had.

use serde::Serialize;

use crate::error::CoreError;

/// Minimum IoU (exclusive) for a geometric match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.20;

/// Confidence recorded for reviewer-added or reviewer-edited boxes.
pub const DEFAULT_MANUAL_CONFIDENCE: f64 = 1.0;

/// Validate that a value falls within `[0.0, 1.0]`.
///
/// Returns a `CoreError::Validation` naming the field if out of range or NaN.
pub fn validate_unit_range(value: f64, name: &str) -> Result<(), CoreError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(())
}

/// Policy applied by every reconciliation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReconcilePolicy {
    /// An annotation without an explicit detection id matches the detection
    /// with the highest IoU only if that IoU is strictly greater than this.
    pub match_threshold: f64,
    /// Confidence forced onto ADDED actions, and onto EDITED actions whose
    /// annotation does not carry its own confidence.
    pub manual_confidence: f64,
}

impl ReconcilePolicy {
    pub fn new(match_threshold: f64, manual_confidence: f64) -> Result<Self, CoreError> {
        validate_unit_range(match_threshold, "match threshold")?;
        validate_unit_range(manual_confidence, "manual confidence")?;
        Ok(Self {
            match_threshold,
            manual_confidence,
        })
    }
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            manual_confidence: DEFAULT_MANUAL_CONFIDENCE,
        }
    }
}
