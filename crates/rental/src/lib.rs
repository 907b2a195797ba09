//! Locker allocation, lifecycle and listing services.
//!
//! Each service is constructed with an explicit [`sqlx::PgPool`] and returns a
//! typed [`RentalResult`]. Nothing here knows about HTTP; the API crate maps
//! [`RentalError`] onto status codes.
//!
//! - [`RentalAllocator`] -- batch creation, rent, return, admin override.
//! - [`LifecycleArchive`] -- soft-delete and restore, per locker and per station.
//! - [`ListingService`] -- paginated enumeration of live lockers.

pub mod allocator;
pub mod archive;
pub mod error;
pub mod listing;

pub use allocator::RentalAllocator;
pub use archive::{LifecycleArchive, StationCascade};
pub use error::{RentalError, RentalResult};
pub use listing::{ListingService, LockerPage};
