//! Repository for the `analysis_results` table.

use flarenet_core::aggregation::summarize;
use flarenet_core::detection::MachineDetection;
use flarenet_core::types::ImageId;
use sqlx::PgPool;

use crate::models::analysis_result::{
    AnalysisResult, AnalysisWithDetections, CreateAnalysisResult,
};
use crate::repositories::DetectionRepo;

/// Column list for analysis_results queries.
const COLUMNS: &str = "id, image_id, status, total_detections, critical_count, \
    potentially_faulty_count, raw_result, analyzed_at, created_at, updated_at";

/// Stores analysis runs and their derived summary.
pub struct AnalysisResultRepo;

impl AnalysisResultRepo {
    /// Find the current analysis result of an image.
    pub async fn find_by_image(
        pool: &PgPool,
        image_id: ImageId,
    ) -> Result<Option<AnalysisResult>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM analysis_results WHERE image_id = $1");
        sqlx::query_as::<_, AnalysisResult>(&query)
            .bind(image_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the current analysis result of an image with its detections.
    pub async fn find_with_detections(
        pool: &PgPool,
        image_id: ImageId,
    ) -> Result<Option<AnalysisWithDetections>, sqlx::Error> {
        let Some(result) = Self::find_by_image(pool, image_id).await? else {
            return Ok(None);
        };
        let detections = DetectionRepo::list_by_analysis_result(pool, result.id).await?;
        Ok(Some(AnalysisWithDetections { result, detections }))
    }

    /// Replace the analysis of an image with a new run.
    ///
    /// The previous result and its detections are deleted, the new
    /// detections are inserted in submitted order, and the summary is
    /// computed from the stored rows. All in one transaction. Callers must
    /// validate `input` first.
    pub async fn replace_for_image(
        pool: &PgPool,
        image_id: ImageId,
        input: &CreateAnalysisResult,
    ) -> Result<AnalysisWithDetections, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Detections cascade.
        sqlx::query("DELETE FROM analysis_results WHERE image_id = $1")
            .bind(image_id)
            .execute(&mut *tx)
            .await?;

        let placeholder = summarize(&[]);
        let insert = format!(
            "INSERT INTO analysis_results (image_id, status, raw_result)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, AnalysisResult>(&insert)
            .bind(image_id)
            .bind(placeholder.status)
            .bind(&input.raw_result)
            .fetch_one(&mut *tx)
            .await?;

        let mut detections = Vec::with_capacity(input.detections.len());
        for detection in &input.detections {
            detections.push(DetectionRepo::create_in_tx(&mut tx, inserted.id, detection).await?);
        }

        let machine: Vec<MachineDetection> =
            detections.iter().cloned().map(MachineDetection::from).collect();
        let summary = summarize(&machine);

        let update = format!(
            "UPDATE analysis_results SET
                status = $1,
                total_detections = $2,
                critical_count = $3,
                potentially_faulty_count = $4
             WHERE id = $5
             RETURNING {COLUMNS}"
        );
        let result = sqlx::query_as::<_, AnalysisResult>(&update)
            .bind(summary.status)
            .bind(summary.total_detections)
            .bind(summary.critical_count)
            .bind(summary.potentially_faulty_count)
            .bind(inserted.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            image_id,
            analysis_result_id = result.id,
            total = result.total_detections,
            "Analysis result replaced"
        );

        Ok(AnalysisWithDetections { result, detections })
    }
}
