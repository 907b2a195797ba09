//! Bearer-token primitives.
//!
//! Accounts and login live in the identity service; this crate only verifies
//! the access tokens it issues.

pub mod jwt;
