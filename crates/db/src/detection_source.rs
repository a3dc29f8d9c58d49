//! [`DetectionSource`] backed by PostgreSQL.

use async_trait::async_trait;
use flarenet_core::detection::MachineDetection;
use flarenet_core::error::CoreError;
use flarenet_core::reconcile::DetectionSource;
use flarenet_core::types::ImageId;

use crate::repositories::DetectionRepo;
use crate::DbPool;

/// Loads the current detection set of an image from the database.
#[derive(Clone)]
pub struct PgDetectionSource {
    pool: DbPool,
}

impl PgDetectionSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DetectionSource for PgDetectionSource {
    async fn load_detections(
        &self,
        image_id: ImageId,
    ) -> Result<Option<Vec<MachineDetection>>, CoreError> {
        let rows = DetectionRepo::list_by_image(&self.pool, image_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, image_id, "Failed to load detections");
                CoreError::Internal(format!("failed to load detections: {e}"))
            })?;

        Ok(rows.map(|rows| rows.into_iter().map(MachineDetection::from).collect()))
    }
}
