//! Repository for the `annotation_actions` table.
//!
//! Append-only: there are no update or delete methods.

use flarenet_core::action::{ActionCounts, ActionFields, ActionType, AnnotationAction};
use flarenet_core::error::CoreError;
use flarenet_core::types::{DbId, ImageId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::annotation_action::{ActionTypeCount, AnnotationActionRow};

/// Column list for annotation_actions queries.
const COLUMNS: &str = "id, review_session_id, image_id, detection_id, action_type, \
    original_label, original_category, original_severity, original_confidence, \
    original_bbox_x, original_bbox_y, original_bbox_width, original_bbox_height, \
    new_label, new_category, new_severity, new_confidence, \
    new_bbox_x, new_bbox_y, new_bbox_width, new_bbox_height, \
    created_at, updated_at";

/// Persists reconciliation batches and serves the action history.
pub struct AnnotationActionRepo;

impl AnnotationActionRepo {
    /// Append a whole batch in one transaction. An empty batch is a no-op.
    pub async fn create_batch(
        pool: &PgPool,
        review_session_id: DbId,
        image_id: ImageId,
        actions: &[AnnotationAction],
    ) -> Result<Vec<AnnotationActionRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let rows = Self::create_batch_in_tx(&mut tx, review_session_id, image_id, actions).await?;
        tx.commit().await?;
        Ok(rows)
    }

    /// Append a batch within an existing transaction, preserving order.
    pub async fn create_batch_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        review_session_id: DbId,
        image_id: ImageId,
        actions: &[AnnotationAction],
    ) -> Result<Vec<AnnotationActionRow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO annotation_actions
                (review_session_id, image_id, detection_id, action_type,
                 original_label, original_category, original_severity, original_confidence,
                 original_bbox_x, original_bbox_y, original_bbox_width, original_bbox_height,
                 new_label, new_category, new_severity, new_confidence,
                 new_bbox_x, new_bbox_y, new_bbox_width, new_bbox_height,
                 created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     $13, $14, $15, $16, $17, $18, $19, $20, $21)
             RETURNING {COLUMNS}"
        );

        let empty = ActionFields::default();
        let mut rows = Vec::with_capacity(actions.len());
        for action in actions {
            let original = action.original.as_ref().unwrap_or(&empty);
            let new = action.new.as_ref().unwrap_or(&empty);

            let row = sqlx::query_as::<_, AnnotationActionRow>(&query)
                .bind(review_session_id)
                .bind(image_id)
                .bind(action.detection_id)
                .bind(action.action_type.as_str())
                .bind(&original.label)
                .bind(&original.category)
                .bind(&original.severity)
                .bind(original.confidence)
                .bind(original.bbox.x)
                .bind(original.bbox.y)
                .bind(original.bbox.width)
                .bind(original.bbox.height)
                .bind(&new.label)
                .bind(&new.category)
                .bind(&new.severity)
                .bind(new.confidence)
                .bind(new.bbox.x)
                .bind(new.bbox.y)
                .bind(new.bbox.width)
                .bind(new.bbox.height)
                .bind(action.created_at)
                .fetch_one(&mut **tx)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// List every action recorded for an image, oldest first.
    pub async fn list_by_image(
        pool: &PgPool,
        image_id: ImageId,
    ) -> Result<Vec<AnnotationActionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM annotation_actions
             WHERE image_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, AnnotationActionRow>(&query)
            .bind(image_id)
            .fetch_all(pool)
            .await
    }

    /// List the actions produced by one review session, in batch order.
    pub async fn list_by_session(
        pool: &PgPool,
        review_session_id: DbId,
    ) -> Result<Vec<AnnotationActionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM annotation_actions
             WHERE review_session_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, AnnotationActionRow>(&query)
            .bind(review_session_id)
            .fetch_all(pool)
            .await
    }

    /// Count stored actions per type for an image. Types with no actions
    /// are omitted.
    pub async fn count_by_type(
        pool: &PgPool,
        image_id: ImageId,
    ) -> Result<Vec<ActionTypeCount>, sqlx::Error> {
        sqlx::query_as::<_, ActionTypeCount>(
            "SELECT action_type, COUNT(*) AS count
             FROM annotation_actions
             WHERE image_id = $1
             GROUP BY action_type
             ORDER BY action_type",
        )
        .bind(image_id)
        .fetch_all(pool)
        .await
    }
}

/// Fold per-type count rows into [`ActionCounts`].
pub fn fold_counts(rows: &[ActionTypeCount]) -> Result<ActionCounts, CoreError> {
    let mut counts = ActionCounts::default();
    for row in rows {
        counts.add(ActionType::from_str(&row.action_type)?, row.count);
    }
    Ok(counts)
}
