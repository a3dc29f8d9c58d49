//! Detection model and DTOs.

use flarenet_core::detection::{validate_detection_fields, MachineDetection, CATEGORY_ANOMALY};
use flarenet_core::error::CoreError;
use flarenet_core::geometry::BoundingBox;
use flarenet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `detections` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Detection {
    pub id: DbId,
    pub analysis_result_id: DbId,
    pub label: String,
    pub category: String,
    pub severity: String,
    pub confidence: f64,
    pub bbox_x: i32,
    pub bbox_y: i32,
    pub bbox_width: i32,
    pub bbox_height: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Detection {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.bbox_x, self.bbox_y, self.bbox_width, self.bbox_height)
    }
}

impl From<Detection> for MachineDetection {
    fn from(row: Detection) -> Self {
        let bbox = row.bbox();
        MachineDetection {
            id: row.id,
            label: row.label,
            category: row.category,
            severity: row.severity,
            confidence: row.confidence,
            bbox,
        }
    }
}

fn default_category() -> String {
    CATEGORY_ANOMALY.to_string()
}

/// DTO for one detection of a new analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDetection {
    pub label: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub severity: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

impl CreateDetection {
    pub fn validate_fields(&self) -> Result<(), CoreError> {
        validate_detection_fields(
            &self.label,
            &self.category,
            &self.severity,
            self.confidence,
            &self.bbox,
        )
    }
}
