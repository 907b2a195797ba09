pub mod locker;
pub mod station;
