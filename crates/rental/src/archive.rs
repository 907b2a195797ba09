//! Soft-delete and restore of lockers, individually and cascaded from their
//! station.
//!
//! A tombstone (`deleted_at`) hides a locker from allocation and listing but
//! leaves every other field in place, so a restore brings back exactly the
//! record that was deleted. Deleting twice or restoring a live record is a
//! caller error, not a no-op.
//!
//! Lock order is always station before locker.

use lockerhub_core::error::CoreError;
use lockerhub_core::types::DbId;
use lockerhub_db::models::locker::Locker;
use lockerhub_db::models::station::Station;
use lockerhub_db::repositories::{LockerRepo, StationRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::RentalResult;

/// Owns tombstone semantics for lockers and the station-level cascade.
#[derive(Clone)]
pub struct LifecycleArchive {
    pool: PgPool,
}

/// Outcome of a station cascade.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationCascade {
    pub station: Station,
    /// Number of lockers tombstoned or restored along with the station.
    pub lockers_affected: u64,
}

impl LifecycleArchive {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ── Single locker ────────────────────────────────────────────────

    /// Tombstone a live locker.
    pub async fn soft_delete(&self, locker_id: DbId) -> RentalResult<()> {
        if LockerRepo::soft_delete(&self.pool, locker_id).await? {
            tracing::info!(locker_id, "Locker soft-deleted");
            return Ok(());
        }

        // Nothing matched: the locker is either missing or already deleted.
        match LockerRepo::find_by_id_include_deleted(&self.pool, locker_id).await? {
            None => Err(CoreError::NotFound {
                entity: "Locker",
                id: locker_id,
            }
            .into()),
            Some(_) => Err(CoreError::UnprocessableState(format!(
                "Locker {locker_id} is already deleted"
            ))
            .into()),
        }
    }

    /// Clear a locker's tombstone, leaving every other field as it was.
    ///
    /// Rejected while the owning station is itself deleted; restore the
    /// station first.
    pub async fn restore(&self, locker_id: DbId) -> RentalResult<Locker> {
        // station_id is immutable, so an unlocked read is enough to find it.
        let station_id = LockerRepo::find_by_id_include_deleted(&self.pool, locker_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Locker",
                id: locker_id,
            })?
            .station_id;

        let mut tx = self.pool.begin().await?;
        let station = StationRepo::lock_for_share(&mut *tx, station_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Station",
                id: station_id,
            })?;
        if station.deleted_at.is_some() {
            return Err(CoreError::UnprocessableState(format!(
                "Locker {locker_id} belongs to deleted station {station_id}; restore the station first"
            ))
            .into());
        }

        let current = LockerRepo::lock_for_update(&mut *tx, locker_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Locker",
                id: locker_id,
            })?;
        if !current.is_deleted() {
            return Err(CoreError::UnprocessableState(format!(
                "Locker {locker_id} is not deleted"
            ))
            .into());
        }

        let restored = LockerRepo::restore(&mut *tx, locker_id)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!(
                    "Locker {locker_id} changed concurrently during restore"
                ))
            })?;
        tx.commit().await?;

        tracing::info!(locker_id, station_id, "Locker restored");
        Ok(restored)
    }

    // ── Station cascade ──────────────────────────────────────────────

    /// Tombstone a station and every live locker it owns in one transaction.
    ///
    /// All rows share the transaction's `NOW()`, which is how
    /// [`LifecycleArchive::restore_station`] recognises the lockers this
    /// cascade deleted.
    pub async fn delete_station(&self, station_id: DbId) -> RentalResult<StationCascade> {
        let mut tx = self.pool.begin().await?;
        let current = StationRepo::lock_for_update(&mut *tx, station_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Station",
                id: station_id,
            })?;
        if current.deleted_at.is_some() {
            return Err(CoreError::UnprocessableState(format!(
                "Station {station_id} is already deleted"
            ))
            .into());
        }

        let station = StationRepo::soft_delete(&mut *tx, station_id)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!(
                    "Station {station_id} changed concurrently during delete"
                ))
            })?;
        let lockers_affected = LockerRepo::soft_delete_by_station(&mut *tx, station_id).await?;
        tx.commit().await?;

        tracing::info!(station_id, lockers_affected, "Station soft-deleted with its lockers");
        Ok(StationCascade {
            station,
            lockers_affected,
        })
    }

    /// Restore a station and the lockers deleted together with it, in one
    /// transaction. Lockers deleted individually before the station stay
    /// deleted.
    pub async fn restore_station(&self, station_id: DbId) -> RentalResult<StationCascade> {
        let mut tx = self.pool.begin().await?;
        let current = StationRepo::lock_for_update(&mut *tx, station_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Station",
                id: station_id,
            })?;
        let Some(stamp) = current.deleted_at else {
            return Err(CoreError::UnprocessableState(format!(
                "Station {station_id} is not deleted"
            ))
            .into());
        };

        let lockers_affected = LockerRepo::restore_by_station(&mut *tx, station_id, stamp).await?;
        let station = StationRepo::restore(&mut *tx, station_id)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!(
                    "Station {station_id} changed concurrently during restore"
                ))
            })?;
        tx.commit().await?;

        tracing::info!(station_id, lockers_affected, "Station restored with its lockers");
        Ok(StationCascade {
            station,
            lockers_affected,
        })
    }
}
