//! Integration tests for the rental allocator.
//!
//! Runs every operation against a real database and checks the occupancy
//! invariants after each step:
//! - `OCCUPIED` if and only if an occupant is recorded
//! - `UNOCCUPIED` rows carry no occupant and no time window

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use futures::future::join_all;
use lockerhub_core::error::CoreError;
use lockerhub_core::locker_status::{Actor, LockerStatus};
use lockerhub_db::models::locker::Locker;
use lockerhub_db::models::locker_rental::{CLOSED_BY_ADMIN, CLOSED_BY_OCCUPANT};
use lockerhub_db::models::station::CreateStation;
use lockerhub_db::repositories::StationRepo;
use lockerhub_rental::{RentalAllocator, RentalError};
use sqlx::PgPool;

const ADMIN: Actor = Actor::Admin { id: 1 };
const ALICE: Actor = Actor::User { id: 100 };
const BOB: Actor = Actor::User { id: 200 };

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed(pool: &PgPool, lockers: i32) -> (RentalAllocator, Vec<Locker>) {
    let station = StationRepo::create(
        pool,
        &CreateStation {
            name: "Seoul Station".to_string(),
            latitude: 37.5547,
            longitude: 126.9707,
        },
    )
    .await
    .unwrap();
    let allocator = RentalAllocator::new(pool.clone());
    let created = allocator
        .create_batch(ADMIN, station.id, lockers)
        .await
        .unwrap();
    (allocator, created)
}

fn assert_invariants(locker: &Locker) {
    assert_eq!(
        locker.status == LockerStatus::Occupied,
        locker.user_id.is_some(),
        "OCCUPIED must coincide with a recorded occupant: {locker:?}"
    );
    if locker.status == LockerStatus::Unoccupied {
        assert!(locker.user_id.is_none(), "{locker:?}");
        assert!(locker.start_date_time.is_none(), "{locker:?}");
        assert!(locker.end_date_time.is_none(), "{locker:?}");
    }
}

fn core(err: RentalError) -> CoreError {
    match err {
        RentalError::Core(core) => core,
        RentalError::Database(db) => panic!("unexpected storage fault: {db}"),
    }
}

// ---------------------------------------------------------------------------
// Batch creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_batch_requires_admin_and_live_station(pool: PgPool) {
    let (allocator, created) = seed(&pool, 2).await;
    let station_id = created[0].station_id;

    let err = allocator.create_batch(ALICE, station_id, 1).await.unwrap_err();
    assert_matches!(core(err), CoreError::Forbidden(_));

    let err = allocator.create_batch(ADMIN, station_id, 0).await.unwrap_err();
    assert_matches!(core(err), CoreError::Validation(_));

    let err = allocator.create_batch(ADMIN, 999_999, 1).await.unwrap_err();
    assert_matches!(core(err), CoreError::NotFound { entity: "Station", .. });
}

// ---------------------------------------------------------------------------
// Rent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rent_sets_occupant_and_start(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;

    let locker = allocator.rent(ALICE, created[0].id).await.unwrap();
    assert_eq!(locker.status, LockerStatus::Occupied);
    assert_eq!(locker.user_id, Some(ALICE.id()));
    assert!(locker.start_date_time.is_some());
    assert_invariants(&locker);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rent_of_occupied_locker_conflicts(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;
    allocator.rent(ALICE, created[0].id).await.unwrap();

    let err = allocator.rent(BOB, created[0].id).await.unwrap_err();
    assert_matches!(core(err), CoreError::Conflict(_));

    let err = allocator.rent(ALICE, created[0].id).await.unwrap_err();
    assert_matches!(core(err), CoreError::Conflict(msg) if msg.contains("already rented"));

    let current = allocator.get(created[0].id).await.unwrap();
    assert_eq!(current.user_id, Some(ALICE.id()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rent_of_missing_locker_is_not_found(pool: PgPool) {
    let (allocator, _) = seed(&pool, 1).await;
    let err = allocator.rent(ALICE, 424_242).await.unwrap_err();
    assert_matches!(core(err), CoreError::NotFound { entity: "Locker", id: 424_242 });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rent_under_management_conflicts(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;
    allocator
        .set_management_status(ADMIN, created[0].id, LockerStatus::UnderManagement)
        .await
        .unwrap();

    let err = allocator.rent(ALICE, created[0].id).await.unwrap_err();
    assert_matches!(core(err), CoreError::Conflict(msg) if msg.contains("UNDER_MANAGEMENT"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_rent_has_exactly_one_winner(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;
    let locker_id = created[0].id;

    let attempts = (1..=16).map(|user| {
        let allocator = allocator.clone();
        async move { allocator.rent(Actor::User { id: user }, locker_id).await }
    });
    let results = join_all(attempts).await;

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one rent must succeed");

    for result in results.iter().filter(|r| r.is_err()) {
        let err = result.as_ref().unwrap_err();
        assert_matches!(err.as_core(), Some(CoreError::Conflict(_)));
    }

    let current = allocator.get(locker_id).await.unwrap();
    assert_eq!(current.user_id, winners[0].user_id);
    assert_invariants(&current);
}

// ---------------------------------------------------------------------------
// Return
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_clears_occupancy_and_records_history(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;
    let rented = allocator.rent(ALICE, created[0].id).await.unwrap();
    let end = Utc::now() + Duration::minutes(5);

    let returned = allocator
        .return_locker(ALICE, created[0].id, end, true)
        .await
        .unwrap();
    assert_eq!(returned.status, LockerStatus::Unoccupied);
    assert_invariants(&returned);

    let history = allocator.rental_history(ADMIN, created[0].id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_id, ALICE.id());
    assert_eq!(history[0].start_date_time, rented.start_date_time.unwrap());
    assert_eq!(history[0].closed_by, CLOSED_BY_OCCUPANT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_by_non_occupant_is_forbidden(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;
    allocator.rent(ALICE, created[0].id).await.unwrap();

    let err = allocator
        .return_locker(BOB, created[0].id, Utc::now(), true)
        .await
        .unwrap_err();
    assert_matches!(core(err), CoreError::Forbidden(_));

    let current = allocator.get(created[0].id).await.unwrap();
    assert_eq!(current.user_id, Some(ALICE.id()), "occupancy must be untouched");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_validates_payment_and_window(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;
    let rented = allocator.rent(ALICE, created[0].id).await.unwrap();

    let err = allocator
        .return_locker(ALICE, created[0].id, Utc::now(), false)
        .await
        .unwrap_err();
    assert_matches!(core(err), CoreError::Validation(_));

    let before_start = rented.start_date_time.unwrap() - Duration::hours(1);
    let err = allocator
        .return_locker(ALICE, created[0].id, before_start, true)
        .await
        .unwrap_err();
    assert_matches!(core(err), CoreError::Validation(_));

    let current = allocator.get(created[0].id).await.unwrap();
    assert_eq!(current.status, LockerStatus::Occupied);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_of_unoccupied_locker_conflicts(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;
    let err = allocator
        .return_locker(ALICE, created[0].id, Utc::now(), true)
        .await
        .unwrap_err();
    assert_matches!(core(err), CoreError::Conflict(_));
}

// ---------------------------------------------------------------------------
// Admin override
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_force_management_clears_occupant_atomically(pool: PgPool) {
    let (allocator, created) = seed(&pool, 2).await;
    let locker_id = created[1].id;
    allocator.rent(ALICE, locker_id).await.unwrap();

    let updated = allocator
        .set_management_status(ADMIN, locker_id, LockerStatus::UnderManagement)
        .await
        .unwrap();
    assert_eq!(updated.status, LockerStatus::UnderManagement);
    assert_eq!(updated.user_id, None);
    assert_eq!(updated.start_date_time, None);
    assert_invariants(&updated);

    let history = allocator.rental_history(ADMIN, locker_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].closed_by, CLOSED_BY_ADMIN);

    // The former occupant can no longer return it.
    let err = allocator
        .return_locker(ALICE, locker_id, Utc::now(), true)
        .await
        .unwrap_err();
    assert_matches!(core(err), CoreError::Conflict(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_force_release_makes_locker_rentable_again(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;
    let locker_id = created[0].id;
    allocator
        .set_management_status(ADMIN, locker_id, LockerStatus::UnderManagement)
        .await
        .unwrap();

    let released = allocator
        .set_management_status(ADMIN, locker_id, LockerStatus::Unoccupied)
        .await
        .unwrap();
    assert_eq!(released.status, LockerStatus::Unoccupied);
    assert_invariants(&released);

    allocator.rent(BOB, locker_id).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_override_rejects_non_admin_and_occupied_target(pool: PgPool) {
    let (allocator, created) = seed(&pool, 1).await;

    let err = allocator
        .set_management_status(ALICE, created[0].id, LockerStatus::UnderManagement)
        .await
        .unwrap_err();
    assert_matches!(core(err), CoreError::Forbidden(_));

    let err = allocator
        .set_management_status(ADMIN, created[0].id, LockerStatus::Occupied)
        .await
        .unwrap_err();
    assert_matches!(core(err), CoreError::Conflict(_));

    let err = allocator
        .set_management_status(ADMIN, 777_777, LockerStatus::Unoccupied)
        .await
        .unwrap_err();
    assert_matches!(core(err), CoreError::NotFound { .. });
}

// ---------------------------------------------------------------------------
// Read projections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_station_and_history_access(pool: PgPool) {
    let (allocator, created) = seed(&pool, 3).await;

    let lockers = allocator.list_by_station(created[0].station_id).await.unwrap();
    assert_eq!(lockers.len(), 3);

    let err = allocator.list_by_station(31_337).await.unwrap_err();
    assert_matches!(core(err), CoreError::NotFound { entity: "Station", .. });

    let err = allocator.rental_history(ALICE, created[0].id).await.unwrap_err();
    assert_matches!(core(err), CoreError::Forbidden(_));
}
