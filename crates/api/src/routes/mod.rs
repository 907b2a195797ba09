pub mod health;
pub mod lockers;
pub mod stations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /lockers                          create batch (admin), list (paginated)
/// /lockers/rental                   rent (user)
/// /lockers/return                   return (occupant)
/// /lockers/management               status override (admin)
/// /lockers/restore/{id}             restore (admin)
/// /lockers/{id}                     get, soft delete (admin)
/// /lockers/{id}/rentals             rental history (admin)
///
/// /stations                         create (admin)
/// /stations/restore/{id}            cascade restore (admin)
/// /stations/{id}                    get, cascade delete (admin)
/// /stations/{id}/lockers            live lockers of a station
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/lockers", lockers::router())
        .nest("/stations", stations::router())
}
