//! Route definitions for the `/lockers` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::locker;
use crate::state::AppState;

/// Routes mounted at `/lockers`.
///
/// ```text
/// POST   /                  -> create
/// GET    /                  -> list            (?page=&limit=&stationId=)
/// POST   /rental            -> rent
/// PATCH  /return            -> return_locker
/// PATCH  /management        -> set_management_status
/// POST   /restore/{id}      -> restore
/// GET    /{id}              -> get_by_id
/// DELETE /{id}              -> delete
/// GET    /{id}/rentals      -> rentals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(locker::create).get(locker::list))
        .route("/rental", post(locker::rent))
        .route("/return", patch(locker::return_locker))
        .route("/management", patch(locker::set_management_status))
        .route("/restore/{id}", post(locker::restore))
        .route("/{id}", get(locker::get_by_id).delete(locker::delete))
        .route("/{id}/rentals", get(locker::rentals))
}
