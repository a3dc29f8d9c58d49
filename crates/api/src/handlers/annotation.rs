//! Handlers for reviewer annotation saves and the resulting action history.
//!
//! A save parses the editor payload, reconciles it against the image's
//! current detections, overwrites the image's review session and appends the
//! action batch, all in one transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use flarenet_core::action::ActionCounts;
use flarenet_core::detection::MachineDetection;
use flarenet_core::error::CoreError;
use flarenet_core::reconcile::{reconcile, reconcile_from_source, SkippedAnnotation};
use flarenet_core::review_payload::parse_review_payload;
use flarenet_core::types::{DbId, ImageId};
use flarenet_db::detection_source::PgDetectionSource;
use flarenet_db::models::annotation_action::AnnotationActionRow;
use flarenet_db::repositories::annotation_action_repo::fold_counts;
use flarenet_db::repositories::{AnnotationActionRepo, DetectionRepo, ReviewSessionRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Reviewer recorded when the editor does not send one.
pub const DEFAULT_REVIEWER_ID: &str = "user";

/* --------------------------------------------------------------------------
   Request / response types
   -------------------------------------------------------------------------- */

/// Query parameters of a save.
#[derive(Debug, Deserialize)]
pub struct SaveAnnotationsQuery {
    pub user_id: Option<String>,
}

impl SaveAnnotationsQuery {
    fn reviewer_id(&self) -> &str {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_REVIEWER_ID)
    }
}

/// Result of a persisted save.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub image_id: ImageId,
    pub review_session_id: DbId,
    pub actions: Vec<AnnotationActionRow>,
    pub skipped: Vec<SkippedAnnotation>,
    pub counts: ActionCounts,
}

/// Per-type action totals for an image.
#[derive(Debug, Serialize)]
pub struct ActionSummary {
    pub image_id: ImageId,
    #[serde(flatten)]
    pub counts: ActionCounts,
    pub total: i64,
}

/* --------------------------------------------------------------------------
   Handlers
   -------------------------------------------------------------------------- */

/// POST /images/{id}/annotations
///
/// Save a reviewer session and record one action per reconciled annotation.
pub async fn save_annotations(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
    Query(query): Query<SaveAnnotationsQuery>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let annotations = parse_review_payload(&payload)?;

    let mut tx = state.pool.begin().await?;

    let detections: Option<Vec<MachineDetection>> =
        DetectionRepo::snapshot_for_image_in_tx(&mut tx, image_id)
            .await?
            .map(|rows| rows.into_iter().map(MachineDetection::from).collect());

    let report = reconcile(
        image_id,
        detections.as_deref(),
        &annotations,
        state.policy(),
        Utc::now(),
    )?;

    let session =
        ReviewSessionRepo::upsert_in_tx(&mut tx, image_id, query.reviewer_id(), &payload).await?;
    let actions =
        AnnotationActionRepo::create_batch_in_tx(&mut tx, session.id, image_id, &report.actions)
            .await?;

    tx.commit().await?;

    let counts = report.counts();
    tracing::info!(
        image_id,
        review_session_id = session.id,
        reviewer_id = %session.reviewer_id,
        annotations = annotations.len(),
        added = counts.added,
        edited = counts.edited,
        deleted = counts.deleted,
        confirmed = counts.confirmed,
        skipped = report.skipped.len(),
        "Reviewer annotations reconciled"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SubmissionResponse {
                image_id,
                review_session_id: session.id,
                actions,
                skipped: report.skipped,
                counts,
            },
        }),
    ))
}

/// POST /images/{id}/annotations/preview
///
/// Reconcile a payload without storing anything.
pub async fn preview_annotations(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let annotations = parse_review_payload(&payload)?;
    let source = PgDetectionSource::new(state.pool.clone());
    let report = reconcile_from_source(&source, image_id, &annotations, state.policy()).await?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /images/{id}/annotations
///
/// Latest saved review session of an image.
pub async fn get_annotations(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
) -> AppResult<impl IntoResponse> {
    let session = ReviewSessionRepo::find_by_image(&state.pool, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ReviewSession",
            id: image_id,
        }))?;
    Ok(Json(DataResponse { data: session }))
}

/// GET /images/{id}/annotation-actions
///
/// Every recorded action for an image, oldest first.
pub async fn list_actions(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
) -> AppResult<impl IntoResponse> {
    let actions = AnnotationActionRepo::list_by_image(&state.pool, image_id).await?;
    Ok(Json(DataResponse { data: actions }))
}

/// GET /images/{id}/annotation-actions/summary
pub async fn action_summary(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
) -> AppResult<impl IntoResponse> {
    let rows = AnnotationActionRepo::count_by_type(&state.pool, image_id).await?;
    let counts = fold_counts(&rows)?;
    Ok(Json(DataResponse {
        data: ActionSummary {
            image_id,
            counts,
            total: counts.total(),
        },
    }))
}
