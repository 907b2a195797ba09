//! Repository for the `lockers` table.
//!
//! Every mutation that changes occupancy carries the expected prior state in
//! its `WHERE` clause. A `None` result means the predicate did not match: the
//! row is gone, soft-deleted, or another writer changed it first.

use lockerhub_core::locker_status::LockerStatus;
use lockerhub_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::locker::Locker;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, station_id, user_id, status, start_date_time, end_date_time, \
    created_at, updated_at, deleted_at";

/// Deterministic listing order: newest first, id breaks ties.
const ORDER_NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// Provides inventory, occupancy and tombstone operations for lockers.
pub struct LockerRepo;

impl LockerRepo {
    // ── Inventory ────────────────────────────────────────────────────

    /// Insert `count` unoccupied lockers for a station, returning them in id order.
    pub async fn create_batch(
        conn: &mut PgConnection,
        station_id: DbId,
        count: i32,
    ) -> Result<Vec<Locker>, sqlx::Error> {
        let query = format!(
            "INSERT INTO lockers (station_id, status)
             SELECT $1, $2 FROM generate_series(1, $3)
             RETURNING {COLUMNS}"
        );
        let mut lockers = sqlx::query_as::<_, Locker>(&query)
            .bind(station_id)
            .bind(LockerStatus::Unoccupied.as_str())
            .bind(count)
            .fetch_all(conn)
            .await?;
        lockers.sort_by_key(|l| l.id);
        Ok(lockers)
    }

    /// Find a locker by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lockers WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a locker by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lockers WHERE id = $1");
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Read a locker (deleted or not) and hold a row lock until the
    /// surrounding transaction ends.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lockers WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List live lockers of a station, newest first.
    pub async fn list_by_station(
        pool: &PgPool,
        station_id: DbId,
    ) -> Result<Vec<Locker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lockers
             WHERE station_id = $1 AND deleted_at IS NULL
             {ORDER_NEWEST_FIRST}"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(station_id)
            .fetch_all(pool)
            .await
    }

    // ── Listing ──────────────────────────────────────────────────────

    /// Count live lockers, optionally restricted to one station.
    pub async fn count_live(pool: &PgPool, station_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM lockers
             WHERE deleted_at IS NULL AND ($1::BIGINT IS NULL OR station_id = $1)",
        )
        .bind(station_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// One page of live lockers, newest first.
    pub async fn list_page(
        pool: &PgPool,
        station_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Locker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lockers
             WHERE deleted_at IS NULL AND ($1::BIGINT IS NULL OR station_id = $1)
             {ORDER_NEWEST_FIRST}
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(station_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    // ── Occupancy ────────────────────────────────────────────────────

    /// Grant occupancy to `user_id` if and only if the locker is currently
    /// live and unoccupied.
    ///
    /// This is a single conditional update, so at most one concurrent caller
    /// can match the `status = 'UNOCCUPIED'` predicate.
    pub async fn try_occupy(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!(
            "UPDATE lockers
             SET status = $3, user_id = $2, start_date_time = NOW(), end_date_time = NULL
             WHERE id = $1 AND status = $4 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .bind(user_id)
            .bind(LockerStatus::Occupied.as_str())
            .bind(LockerStatus::Unoccupied.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move a live locker from `expected_status` (held by `expected_user`) to
    /// a non-occupied `target`, clearing occupant and window fields in the
    /// same write.
    pub async fn vacate(
        conn: &mut PgConnection,
        id: DbId,
        expected_status: LockerStatus,
        expected_user: Option<DbId>,
        target: LockerStatus,
    ) -> Result<Option<Locker>, sqlx::Error> {
        debug_assert!(target != LockerStatus::Occupied);
        let query = format!(
            "UPDATE lockers
             SET status = $4, user_id = NULL, start_date_time = NULL, end_date_time = NULL
             WHERE id = $1 AND status = $2 AND user_id IS NOT DISTINCT FROM $3
               AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .bind(expected_status.as_str())
            .bind(expected_user)
            .bind(target.as_str())
            .fetch_optional(conn)
            .await
    }

    // ── Tombstones ───────────────────────────────────────────────────

    /// Soft-delete a live locker. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE lockers SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the tombstone of a soft-deleted locker, returning the restored row.
    pub async fn restore(conn: &mut PgConnection, id: DbId) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!(
            "UPDATE lockers SET deleted_at = NULL
             WHERE id = $1 AND deleted_at IS NOT NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Tombstone every live locker of a station with the transaction timestamp.
    ///
    /// Must run in the same transaction as the station's own tombstone so both
    /// share one `NOW()` value.
    pub async fn soft_delete_by_station(
        conn: &mut PgConnection,
        station_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE lockers SET deleted_at = NOW() WHERE station_id = $1 AND deleted_at IS NULL",
        )
        .bind(station_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Restore the lockers of a station that were tombstoned together with it.
    ///
    /// Lockers deleted individually before the station carry an older stamp
    /// and stay deleted.
    pub async fn restore_by_station(
        conn: &mut PgConnection,
        station_id: DbId,
        stamp: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE lockers SET deleted_at = NULL WHERE station_id = $1 AND deleted_at = $2",
        )
        .bind(station_id)
        .bind(stamp)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
