//! Completed-occupancy history.

use lockerhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// The occupant returned the locker.
pub const CLOSED_BY_OCCUPANT: &str = "occupant";
/// An admin released or re-purposed the locker while it was occupied.
pub const CLOSED_BY_ADMIN: &str = "admin";

/// A row from the `locker_rentals` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerRental {
    pub id: DbId,
    pub locker_id: DbId,
    pub user_id: DbId,
    pub start_date_time: Timestamp,
    pub end_date_time: Timestamp,
    pub closed_by: String,
    pub created_at: Timestamp,
}

/// DTO for recording a finished occupancy.
#[derive(Debug, Clone)]
pub struct NewLockerRental {
    pub locker_id: DbId,
    pub user_id: DbId,
    pub start_date_time: Timestamp,
    pub end_date_time: Timestamp,
    pub closed_by: &'static str,
}
