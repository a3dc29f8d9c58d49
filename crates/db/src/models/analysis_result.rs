//! Analysis result model and DTOs.

use flarenet_core::types::{DbId, ImageId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::detection::{CreateDetection, Detection};

/// A row from the `analysis_results` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalysisResult {
    pub id: DbId,
    pub image_id: ImageId,
    pub status: String,
    pub total_detections: i32,
    pub critical_count: i32,
    pub potentially_faulty_count: i32,
    pub raw_result: Option<serde_json::Value>,
    pub analyzed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for storing a new analysis run of an image.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnalysisResult {
    /// Analyzer output kept as-is for traceability.
    #[serde(default)]
    pub raw_result: Option<serde_json::Value>,
    #[serde(default)]
    #[validate(length(max = 500, message = "at most 500 detections per analysis run"))]
    pub detections: Vec<CreateDetection>,
}

/// An analysis result together with its detections in stored order.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisWithDetections {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub detections: Vec<Detection>,
}
