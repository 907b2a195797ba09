//! Repository for the `locker_rentals` history table.

use lockerhub_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::locker_rental::{LockerRental, NewLockerRental};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, locker_id, user_id, start_date_time, end_date_time, closed_by, created_at";

pub struct RentalRepo;

impl RentalRepo {
    /// Record a finished occupancy. Runs inside the transaction that vacates
    /// the locker so history and state never disagree.
    pub async fn record(
        conn: &mut PgConnection,
        input: &NewLockerRental,
    ) -> Result<LockerRental, sqlx::Error> {
        let query = format!(
            "INSERT INTO locker_rentals
                (locker_id, user_id, start_date_time, end_date_time, closed_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LockerRental>(&query)
            .bind(input.locker_id)
            .bind(input.user_id)
            .bind(input.start_date_time)
            .bind(input.end_date_time)
            .bind(input.closed_by)
            .fetch_one(conn)
            .await
    }

    /// List a locker's past occupancies, most recently ended first.
    pub async fn list_by_locker(
        pool: &PgPool,
        locker_id: DbId,
    ) -> Result<Vec<LockerRental>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locker_rentals
             WHERE locker_id = $1
             ORDER BY end_date_time DESC, id DESC"
        );
        sqlx::query_as::<_, LockerRental>(&query)
            .bind(locker_id)
            .fetch_all(pool)
            .await
    }
}
