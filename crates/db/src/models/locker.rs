//! Locker entity model.

use lockerhub_core::locker_status::LockerStatus;
use lockerhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A locker row from the `lockers` table.
///
/// `status` is stored as TEXT and decoded through `LockerStatus: TryFrom<String>`,
/// so an unexpected value in the column surfaces as a decode error rather than
/// an unchecked string.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Locker {
    pub id: DbId,
    pub station_id: DbId,
    pub user_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub status: LockerStatus,
    pub start_date_time: Option<Timestamp>,
    pub end_date_time: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Locker {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
