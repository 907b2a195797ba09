//! Route definitions for the `/stations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::station;
use crate::state::AppState;

/// Routes mounted at `/stations`.
///
/// ```text
/// POST   /                  -> create
/// POST   /restore/{id}      -> restore   (cascades to lockers)
/// GET    /{id}              -> get_by_id
/// DELETE /{id}              -> delete    (cascades to lockers)
/// GET    /{id}/lockers      -> lockers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(station::create))
        .route("/restore/{id}", post(station::restore))
        .route("/{id}", get(station::get_by_id).delete(station::delete))
        .route("/{id}/lockers", get(station::lockers))
}
