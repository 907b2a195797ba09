//! Handlers for the `/stations` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lockerhub_core::error::CoreError;
use lockerhub_core::types::DbId;
use lockerhub_db::models::locker::Locker;
use lockerhub_db::models::station::{CreateStation, Station};
use lockerhub_db::repositories::StationRepo;
use lockerhub_rental::StationCascade;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// POST /api/v1/stations
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(input): JsonBody<CreateStationRequest>,
) -> AppResult<(StatusCode, Json<Station>)> {
    input.validate()?;
    let station = StationRepo::create(
        &state.pool,
        &CreateStation {
            name: input.name.trim().to_string(),
            latitude: input.latitude,
            longitude: input.longitude,
        },
    )
    .await?;
    tracing::info!(station_id = station.id, admin_id = admin.user_id, "Station created");
    Ok((StatusCode::CREATED, Json(station)))
}

/// GET /api/v1/stations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Station>> {
    let station = StationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Station",
            id,
        }))?;
    Ok(Json(station))
}

/// GET /api/v1/stations/{id}/lockers
pub async fn lockers(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Locker>>> {
    Ok(Json(state.allocator.list_by_station(id).await?))
}

/// DELETE /api/v1/stations/{id}
///
/// Cascades to every live locker of the station.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.archive.delete_station(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/stations/restore/{id}
pub async fn restore(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<StationCascade>> {
    Ok(Json(state.archive.restore_station(id).await?))
}
