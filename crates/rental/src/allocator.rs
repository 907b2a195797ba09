//! Locker inventory creation and occupancy changes.
//!
//! Correctness under concurrent callers (including callers in other
//! processes) rests on the database alone:
//!
//! - `rent` is a single conditional update guarded by `status = 'UNOCCUPIED'`.
//! - `return_locker` and `set_management_status` lock the row with
//!   `SELECT ... FOR UPDATE`, re-validate against the state machine, and write
//!   with a predicate on the prior status and occupant.
//!
//! A write that matches no row has lost a race and is reported as a conflict.

use chrono::Utc;
use lockerhub_core::error::CoreError;
use lockerhub_core::locker_status::{can_transition, Actor, LockerEvent, LockerStatus};
use lockerhub_core::types::{DbId, Timestamp};
use lockerhub_db::models::locker::Locker;
use lockerhub_db::models::locker_rental::{
    LockerRental, NewLockerRental, CLOSED_BY_ADMIN, CLOSED_BY_OCCUPANT,
};
use lockerhub_db::repositories::{LockerRepo, RentalRepo, StationRepo};
use sqlx::PgPool;

use crate::error::RentalResult;

/// Orchestrates locker occupancy against the shared store.
#[derive(Clone)]
pub struct RentalAllocator {
    pool: PgPool,
}

impl RentalAllocator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ── Inventory ────────────────────────────────────────────────────

    /// Create `count` unoccupied lockers at a live station.
    ///
    /// The station row is share-locked for the duration of the insert so a
    /// concurrent station delete cannot leave new lockers behind a tombstone.
    pub async fn create_batch(
        &self,
        actor: Actor,
        station_id: DbId,
        count: i32,
    ) -> RentalResult<Vec<Locker>> {
        require_admin(actor, "create lockers")?;
        if count < 1 {
            return Err(CoreError::Validation(format!(
                "numberLockers must be a positive integer (got {count})"
            ))
            .into());
        }

        let mut tx = self.pool.begin().await?;
        StationRepo::lock_for_share(&mut *tx, station_id)
            .await?
            .filter(|s| s.deleted_at.is_none())
            .ok_or(CoreError::NotFound {
                entity: "Station",
                id: station_id,
            })?;
        let lockers = LockerRepo::create_batch(&mut *tx, station_id, count).await?;
        tx.commit().await?;

        tracing::info!(
            station_id,
            count,
            admin_id = actor.id(),
            "Locker batch created",
        );
        Ok(lockers)
    }

    // ── Occupancy ────────────────────────────────────────────────────

    /// Grant the caller exclusive occupancy of an unoccupied locker.
    ///
    /// The write happens first; only when it matches nothing is the row
    /// re-read to explain why.
    pub async fn rent(&self, actor: Actor, locker_id: DbId) -> RentalResult<Locker> {
        if let Some(locker) = LockerRepo::try_occupy(&self.pool, locker_id, actor.id()).await? {
            tracing::info!(locker_id, user_id = actor.id(), "Locker rented");
            return Ok(locker);
        }

        let current = self.find_live(locker_id).await?;
        let verdict = can_transition(current.status, current.user_id, LockerEvent::Rent, actor);
        let err = match verdict {
            Err(rejection) => rejection.into_core_error(locker_id),
            // Released again between the write and the re-read.
            Ok(_) => lost_race(LockerEvent::Rent, locker_id),
        };
        tracing::debug!(locker_id, user_id = actor.id(), error = %err, "Rent rejected");
        Err(err.into())
    }

    /// End the caller's occupancy.
    ///
    /// Only the recorded occupant may return a locker, and only once payment
    /// has been confirmed. The finished window is written to rental history in
    /// the same transaction that clears the live row.
    pub async fn return_locker(
        &self,
        actor: Actor,
        locker_id: DbId,
        end_date_time: Timestamp,
        payment_confirmed: bool,
    ) -> RentalResult<Locker> {
        if !payment_confirmed {
            return Err(CoreError::Validation(format!(
                "Payment must be confirmed before returning locker {locker_id}"
            ))
            .into());
        }

        let mut tx = self.pool.begin().await?;
        let current = LockerRepo::lock_for_update(&mut *tx, locker_id)
            .await?
            .filter(|l| !l.is_deleted())
            .ok_or(CoreError::NotFound {
                entity: "Locker",
                id: locker_id,
            })?;

        let transition = can_transition(
            current.status,
            current.user_id,
            LockerEvent::Return,
            actor,
        )
        .map_err(|rejection| {
            tracing::debug!(locker_id, user_id = actor.id(), ?rejection, "Return rejected");
            rejection.into_core_error(locker_id)
        })?;

        let start_date_time = occupancy_start(&current)?;
        if end_date_time < start_date_time {
            return Err(CoreError::Validation(format!(
                "endDateTime {end_date_time} is earlier than startDateTime {start_date_time} \
                 for locker {locker_id}"
            ))
            .into());
        }

        let updated = LockerRepo::vacate(
            &mut *tx,
            locker_id,
            transition.from,
            current.user_id,
            transition.to,
        )
        .await?
        .ok_or_else(|| lost_race(LockerEvent::Return, locker_id))?;

        RentalRepo::record(
            &mut *tx,
            &NewLockerRental {
                locker_id,
                user_id: actor.id(),
                start_date_time,
                end_date_time,
                closed_by: CLOSED_BY_OCCUPANT,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(locker_id, user_id = actor.id(), "Locker returned");
        Ok(updated)
    }

    /// Force a locker into `target` regardless of its occupant.
    ///
    /// Forcing an occupied locker clears the occupant in the same write and
    /// closes the occupancy in rental history. `OCCUPIED` is not a valid
    /// target: occupancy is only granted through [`RentalAllocator::rent`].
    pub async fn set_management_status(
        &self,
        actor: Actor,
        locker_id: DbId,
        target: LockerStatus,
    ) -> RentalResult<Locker> {
        let event = LockerEvent::forcing(target).ok_or_else(|| {
            CoreError::Conflict(format!(
                "Locker {locker_id} cannot be forced into {target}; occupancy is only granted by rental"
            ))
        })?;

        let mut tx = self.pool.begin().await?;
        let current = LockerRepo::lock_for_update(&mut *tx, locker_id)
            .await?
            .filter(|l| !l.is_deleted())
            .ok_or(CoreError::NotFound {
                entity: "Locker",
                id: locker_id,
            })?;

        let transition = can_transition(current.status, current.user_id, event, actor)
            .map_err(|rejection| rejection.into_core_error(locker_id))?;

        let updated = LockerRepo::vacate(
            &mut *tx,
            locker_id,
            transition.from,
            current.user_id,
            transition.to,
        )
        .await?
        .ok_or_else(|| lost_race(event, locker_id))?;

        if transition.clears_occupant {
            let start_date_time = occupancy_start(&current)?;
            let occupant = current.user_id.ok_or_else(|| {
                CoreError::Internal(format!("Occupied locker {locker_id} has no occupant"))
            })?;
            RentalRepo::record(
                &mut *tx,
                &NewLockerRental {
                    locker_id,
                    user_id: occupant,
                    start_date_time,
                    end_date_time: Utc::now().max(start_date_time),
                    closed_by: CLOSED_BY_ADMIN,
                },
            )
            .await?;
        }
        tx.commit().await?;

        tracing::info!(
            locker_id,
            admin_id = actor.id(),
            from = %transition.from,
            to = %transition.to,
            cleared_occupant = transition.clears_occupant,
            "Locker status overridden",
        );
        Ok(updated)
    }

    // ── Read projections ─────────────────────────────────────────────

    /// Fetch one live locker.
    pub async fn get(&self, locker_id: DbId) -> RentalResult<Locker> {
        self.find_live(locker_id).await
    }

    /// All live lockers of a live station, newest first.
    pub async fn list_by_station(&self, station_id: DbId) -> RentalResult<Vec<Locker>> {
        StationRepo::find_by_id(&self.pool, station_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Station",
                id: station_id,
            })?;
        Ok(LockerRepo::list_by_station(&self.pool, station_id).await?)
    }

    /// Completed occupancies of a locker, including soft-deleted lockers.
    pub async fn rental_history(
        &self,
        actor: Actor,
        locker_id: DbId,
    ) -> RentalResult<Vec<LockerRental>> {
        require_admin(actor, "view rental history")?;
        LockerRepo::find_by_id_include_deleted(&self.pool, locker_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Locker",
                id: locker_id,
            })?;
        Ok(RentalRepo::list_by_locker(&self.pool, locker_id).await?)
    }

    async fn find_live(&self, locker_id: DbId) -> RentalResult<Locker> {
        let locker = LockerRepo::find_by_id(&self.pool, locker_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Locker",
                id: locker_id,
            })?;
        Ok(locker)
    }
}

// ── Private helpers ──────────────────────────────────────────────────────

fn require_admin(actor: Actor, action: &str) -> Result<(), CoreError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("Admin role required to {action}")))
    }
}

fn lost_race(event: LockerEvent, locker_id: DbId) -> CoreError {
    CoreError::Conflict(format!(
        "Locker {locker_id} changed concurrently during {event}; re-read and retry"
    ))
}

fn occupancy_start(locker: &Locker) -> Result<Timestamp, CoreError> {
    locker.start_date_time.ok_or_else(|| {
        CoreError::Internal(format!(
            "Occupied locker {} has no startDateTime",
            locker.id
        ))
    })
}
