//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument, or `&mut PgConnection` when the call must
//! join a caller-owned transaction.

pub mod locker_repo;
pub mod rental_repo;
pub mod station_repo;

pub use locker_repo::LockerRepo;
pub use rental_repo::RentalRepo;
pub use station_repo::StationRepo;
