//! Row models and input DTOs, one module per table.

pub mod locker;
pub mod locker_rental;
pub mod station;
