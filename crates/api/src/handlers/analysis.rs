//! Handlers for storing and reading the machine analysis of an image.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use flarenet_core::error::CoreError;
use flarenet_core::reconcile::ANALYSIS_RESULT_ENTITY;
use flarenet_core::types::ImageId;
use flarenet_db::models::analysis_result::CreateAnalysisResult;
use flarenet_db::repositories::AnalysisResultRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /images/{id}/analysis
///
/// Store a new analysis run, replacing any previous one for the image.
pub async fn put_analysis(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
    Json(input): Json<CreateAnalysisResult>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    for (i, detection) in input.detections.iter().enumerate() {
        detection.validate_fields().map_err(|e| match e {
            CoreError::Validation(msg) => {
                AppError::Core(CoreError::Validation(format!("detections[{i}]: {msg}")))
            }
            other => AppError::Core(other),
        })?;
    }

    let stored = AnalysisResultRepo::replace_for_image(&state.pool, image_id, &input).await?;

    tracing::info!(
        image_id,
        analysis_result_id = stored.result.id,
        status = %stored.result.status,
        total_detections = stored.result.total_detections,
        critical_count = stored.result.critical_count,
        "Analysis result stored"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}

/// GET /images/{id}/analysis
///
/// Current analysis result with its detections in stored order.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(image_id): Path<ImageId>,
) -> AppResult<impl IntoResponse> {
    let analysis = AnalysisResultRepo::find_with_detections(&state.pool, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: ANALYSIS_RESULT_ENTITY,
            id: image_id,
        }))?;
    Ok(Json(DataResponse { data: analysis }))
}
