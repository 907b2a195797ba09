//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the principal behind a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireUser`] -- requires any known role.

pub mod auth;
pub mod rbac;
