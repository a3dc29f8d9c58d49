//! Review session model.

use flarenet_core::types::{DbId, ImageId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `review_sessions` table: the latest editor save for an
/// image.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewSession {
    pub id: DbId,
    pub image_id: ImageId,
    pub reviewer_id: String,
    pub annotations_json: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
