//! Handlers for the `/lockers` resource.
//!
//! Request bodies use camelCase keys. Every handler converts the
//! authenticated principal into an [`Actor`](lockerhub_core::locker_status::Actor)
//! and delegates to the rental services in [`AppState`].

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lockerhub_core::locker_status::LockerStatus;
use lockerhub_core::types::{DbId, Timestamp};
use lockerhub_db::models::locker::Locker;
use lockerhub_db::models::locker_rental::LockerRental;
use lockerhub_rental::LockerPage;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::rbac::{RequireAdmin, RequireUser};
use crate::query::LockerListParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLockersRequest {
    #[validate(range(min = 1))]
    pub station_id: DbId,
    #[validate(range(min = 1))]
    pub number_lockers: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RentLockerRequest {
    #[validate(range(min = 1))]
    pub locker_id: DbId,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReturnLockerRequest {
    #[validate(range(min = 1))]
    pub id: DbId,
    pub end_date_time: Timestamp,
    /// Payment confirmation from the billing collaborator.
    pub payment: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ManagementRequest {
    #[validate(range(min = 1))]
    pub locker_id: DbId,
    /// Target status string, e.g. `"UNDER_MANAGEMENT"`.
    pub status: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/lockers
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(input): JsonBody<CreateLockersRequest>,
) -> AppResult<(StatusCode, Json<Vec<Locker>>)> {
    input.validate()?;
    let lockers = state
        .allocator
        .create_batch(admin.actor(), input.station_id, input.number_lockers)
        .await?;
    Ok((StatusCode::CREATED, Json(lockers)))
}

/// GET /api/v1/lockers?page=&limit=&stationId=
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<LockerListParams>,
) -> AppResult<Json<LockerPage>> {
    let page = state
        .listing
        .list(params.page, params.limit, params.station_id)
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/lockers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Locker>> {
    Ok(Json(state.allocator.get(id).await?))
}

/// POST /api/v1/lockers/rental
pub async fn rent(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    JsonBody(input): JsonBody<RentLockerRequest>,
) -> AppResult<Json<Locker>> {
    input.validate()?;
    let locker = state.allocator.rent(user.actor(), input.locker_id).await?;
    Ok(Json(locker))
}

/// PATCH /api/v1/lockers/return
pub async fn return_locker(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    JsonBody(input): JsonBody<ReturnLockerRequest>,
) -> AppResult<Json<Locker>> {
    input.validate()?;
    let locker = state
        .allocator
        .return_locker(user.actor(), input.id, input.end_date_time, input.payment)
        .await?;
    Ok(Json(locker))
}

/// PATCH /api/v1/lockers/management
pub async fn set_management_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(input): JsonBody<ManagementRequest>,
) -> AppResult<Json<Locker>> {
    input.validate()?;
    let target = LockerStatus::from_str(&input.status)?;
    let locker = state
        .allocator
        .set_management_status(admin.actor(), input.locker_id, target)
        .await?;
    Ok(Json(locker))
}

/// DELETE /api/v1/lockers/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.archive.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/lockers/restore/{id}
pub async fn restore(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Locker>> {
    Ok(Json(state.archive.restore(id).await?))
}

/// GET /api/v1/lockers/{id}/rentals
pub async fn rentals(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<LockerRental>>> {
    let history = state.allocator.rental_history(admin.actor(), id).await?;
    Ok(Json(history))
}
