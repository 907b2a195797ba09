//! Repository for the `stations` table.
//!
//! Only what the locker lifecycle needs: registration, lookup and the
//! tombstone half of the station cascade. The locker half lives in
//! [`LockerRepo`](crate::repositories::LockerRepo).

use lockerhub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::station::{CreateStation, Station};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, latitude, longitude, deleted_at, created_at, updated_at";

pub struct StationRepo;

impl StationRepo {
    /// Insert a new station, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStation) -> Result<Station, sqlx::Error> {
        let query = format!(
            "INSERT INTO stations (name, latitude, longitude)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Station>(&query)
            .bind(&input.name)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_one(pool)
            .await
    }

    /// Find a station by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Station>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stations WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Station>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Read a station (deleted or not) under an exclusive row lock.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Station>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stations WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Station>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Read a station (deleted or not) under a shared row lock, blocking a
    /// concurrent cascade until the surrounding transaction ends.
    pub async fn lock_for_share(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Station>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stations WHERE id = $1 FOR SHARE");
        sqlx::query_as::<_, Station>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Tombstone a live station with the transaction timestamp.
    pub async fn soft_delete(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Station>, sqlx::Error> {
        let query = format!(
            "UPDATE stations SET deleted_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Station>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Clear a station's tombstone, returning the restored row.
    pub async fn restore(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Station>, sqlx::Error> {
        let query = format!(
            "UPDATE stations SET deleted_at = NULL
             WHERE id = $1 AND deleted_at IS NOT NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Station>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
