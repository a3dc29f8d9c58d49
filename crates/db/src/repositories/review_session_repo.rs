//! Repository for the `review_sessions` table.

use flarenet_core::types::ImageId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::review_session::ReviewSession;

/// Column list for review_sessions queries.
const COLUMNS: &str = "id, image_id, reviewer_id, annotations_json, created_at, updated_at";

/// One review session per image. Every save overwrites the payload; the
/// reviewer who opened the session is kept.
pub struct ReviewSessionRepo;

impl ReviewSessionRepo {
    /// Find the latest review session of an image.
    pub async fn find_by_image(
        pool: &PgPool,
        image_id: ImageId,
    ) -> Result<Option<ReviewSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM review_sessions WHERE image_id = $1");
        sqlx::query_as::<_, ReviewSession>(&query)
            .bind(image_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite the review session of an image.
    pub async fn upsert(
        pool: &PgPool,
        image_id: ImageId,
        reviewer_id: &str,
        annotations_json: &serde_json::Value,
    ) -> Result<ReviewSession, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let session = Self::upsert_in_tx(&mut tx, image_id, reviewer_id, annotations_json).await?;
        tx.commit().await?;
        Ok(session)
    }

    /// Insert or overwrite the review session of an image within an existing
    /// transaction. An existing session keeps its original `reviewer_id`.
    pub async fn upsert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        image_id: ImageId,
        reviewer_id: &str,
        annotations_json: &serde_json::Value,
    ) -> Result<ReviewSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_sessions (image_id, reviewer_id, annotations_json)
             VALUES ($1, $2, $3)
             ON CONFLICT (image_id) DO UPDATE SET
                annotations_json = EXCLUDED.annotations_json
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewSession>(&query)
            .bind(image_id)
            .bind(reviewer_id)
            .bind(annotations_json)
            .fetch_one(&mut **tx)
            .await
    }
}
