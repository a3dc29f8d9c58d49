pub mod health;
pub mod image;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /images/{id}/analysis                         store (PUT), get
/// /images/{id}/annotations                      save (POST), get latest session
/// /images/{id}/annotations/preview              reconcile without storing (POST)
/// /images/{id}/annotation-actions               action history
/// /images/{id}/annotation-actions/summary       per-type counts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/images", image::router())
}
