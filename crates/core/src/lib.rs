//! Pure domain logic for the locker rental service.
//!
//! Nothing in this crate performs I/O. The database and HTTP layers build on
//! these types and rules.

pub mod error;
pub mod locker_status;
pub mod pagination;
pub mod roles;
pub mod types;
