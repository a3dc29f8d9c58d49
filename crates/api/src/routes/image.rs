//! Route definitions for the `/images` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analysis, annotation};
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// GET    /{id}/analysis                     -> get_analysis
/// PUT    /{id}/analysis                     -> put_analysis
/// GET    /{id}/annotations                  -> get_annotations
/// POST   /{id}/annotations                  -> save_annotations
/// POST   /{id}/annotations/preview          -> preview_annotations
/// GET    /{id}/annotation-actions           -> list_actions
/// GET    /{id}/annotation-actions/summary   -> action_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/analysis",
            get(analysis::get_analysis).put(analysis::put_analysis),
        )
        .route(
            "/{id}/annotations",
            get(annotation::get_annotations).post(annotation::save_annotations),
        )
        .route(
            "/{id}/annotations/preview",
            post(annotation::preview_annotations),
        )
        .route("/{id}/annotation-actions", get(annotation::list_actions))
        .route(
            "/{id}/annotation-actions/summary",
            get(annotation::action_summary),
        )
}
