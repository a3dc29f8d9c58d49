//! Machine detections produced by the external thermal-image analyzer.
//!
//! A detection set belongs to one analysis run of one image and is replaced
//! wholesale when the image is re-analyzed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::BoundingBox;
use crate::policy::validate_unit_range;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Severity and category constants
// ---------------------------------------------------------------------------

/// Severity assigned to hot spots that need immediate maintenance.
pub const SEVERITY_CRITICAL: &str = "Critical";

/// Severity assigned to hot spots that warrant a follow-up inspection.
pub const SEVERITY_POTENTIALLY_FAULTY: &str = "Potentially Faulty";

/// Severity assigned to regions the analyzer considers within limits.
pub const SEVERITY_NORMAL: &str = "Normal";

pub const CATEGORY_ANOMALY: &str = "anomaly";

/// Maximum label length, matching the `detections.label` column.
pub const MAX_LABEL_LENGTH: usize = 100;

/// Maximum category / severity length, matching their columns.
pub const MAX_CLASS_LENGTH: usize = 50;

/// Case-insensitive severity comparison.
pub fn severity_is(severity: &str, expected: &str) -> bool {
    severity.eq_ignore_ascii_case(expected)
}

// ---------------------------------------------------------------------------
// MachineDetection
// ---------------------------------------------------------------------------

/// One finding from the analyzer for a given image and analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDetection {
    pub id: DbId,
    pub label: String,
    pub category: String,
    pub severity: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

impl MachineDetection {
    pub fn is_critical(&self) -> bool {
        severity_is(&self.severity, SEVERITY_CRITICAL)
    }

    pub fn is_potentially_faulty(&self) -> bool {
        severity_is(&self.severity, SEVERITY_POTENTIALLY_FAULTY)
    }

    /// Check the invariants a detection must satisfy before it is stored.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_detection_fields(
            &self.label,
            &self.category,
            &self.severity,
            self.confidence,
            &self.bbox,
        )
    }
}

/// Validate the fields of a detection that has not been assigned an id yet.
///
/// - `label` must be non-empty and at most [`MAX_LABEL_LENGTH`] characters.
/// - `category` and `severity` must be at most [`MAX_CLASS_LENGTH`] characters.
/// - `confidence` must be within `[0.0, 1.0]`.
/// - the box must have positive width and height.
pub fn validate_detection_fields(
    label: &str,
    category: &str,
    severity: &str,
    confidence: f64,
    bbox: &BoundingBox,
) -> Result<(), CoreError> {
    if label.trim().is_empty() {
        return Err(CoreError::Validation(
            "detection label must not be empty".to_string(),
        ));
    }
    if label.chars().count() > MAX_LABEL_LENGTH {
        return Err(CoreError::Validation(format!(
            "detection label exceeds {MAX_LABEL_LENGTH} characters"
        )));
    }
    for (name, value) in [("category", category), ("severity", severity)] {
        if value.chars().count() > MAX_CLASS_LENGTH {
            return Err(CoreError::Validation(format!(
                "detection {name} exceeds {MAX_CLASS_LENGTH} characters"
            )));
        }
    }
    validate_unit_range(confidence, "detection confidence")?;
    if bbox.width <= 0 || bbox.height <= 0 {
        return Err(CoreError::Validation(format!(
            "detection bounding box must have positive size, got {}x{}",
            bbox.width, bbox.height
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
