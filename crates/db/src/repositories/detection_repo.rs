//! Repository for the `detections` table.

use flarenet_core::types::{DbId, ImageId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::detection::{CreateDetection, Detection};

/// Column list for detections queries.
const COLUMNS: &str = "id, analysis_result_id, label, category, severity, confidence, \
    bbox_x, bbox_y, bbox_width, bbox_height, created_at, updated_at";

/// Read access to machine detections. Detections are only ever written as
/// part of [`crate::repositories::AnalysisResultRepo::replace_for_image`].
pub struct DetectionRepo;

impl DetectionRepo {
    /// List the detections of an analysis result in insertion order.
    pub async fn list_by_analysis_result(
        pool: &PgPool,
        analysis_result_id: DbId,
    ) -> Result<Vec<Detection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM detections
             WHERE analysis_result_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Detection>(&query)
            .bind(analysis_result_id)
            .fetch_all(pool)
            .await
    }

    /// Current detection set of an image, or `None` if it was never analyzed.
    pub async fn list_by_image(
        pool: &PgPool,
        image_id: ImageId,
    ) -> Result<Option<Vec<Detection>>, sqlx::Error> {
        let result_id: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM analysis_results WHERE image_id = $1")
                .bind(image_id)
                .fetch_optional(pool)
                .await?;

        match result_id {
            Some((id,)) => Ok(Some(Self::list_by_analysis_result(pool, id).await?)),
            None => Ok(None),
        }
    }

    /// Like [`Self::list_by_image`], but within a transaction and holding a
    /// share lock on the analysis result so a concurrent re-analysis cannot
    /// replace the set before the transaction ends.
    pub async fn snapshot_for_image_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        image_id: ImageId,
    ) -> Result<Option<Vec<Detection>>, sqlx::Error> {
        let result_id: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM analysis_results WHERE image_id = $1 FOR SHARE",
        )
        .bind(image_id)
        .fetch_optional(&mut **tx)
        .await?;

        let Some((id,)) = result_id else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {COLUMNS} FROM detections
             WHERE analysis_result_id = $1
             ORDER BY id ASC"
        );
        let rows = sqlx::query_as::<_, Detection>(&query)
            .bind(id)
            .fetch_all(&mut **tx)
            .await?;
        Ok(Some(rows))
    }

    /// Insert one detection of a new analysis run.
    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        analysis_result_id: DbId,
        input: &CreateDetection,
    ) -> Result<Detection, sqlx::Error> {
        let query = format!(
            "INSERT INTO detections
                (analysis_result_id, label, category, severity, confidence,
                 bbox_x, bbox_y, bbox_width, bbox_height)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Detection>(&query)
            .bind(analysis_result_id)
            .bind(&input.label)
            .bind(&input.category)
            .bind(&input.severity)
            .bind(input.confidence)
            .bind(input.bbox.x)
            .bind(input.bbox.y)
            .bind(input.bbox.width)
            .bind(input.bbox.height)
            .fetch_one(&mut **tx)
            .await
    }
}
