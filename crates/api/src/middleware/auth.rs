//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lockerhub_core::error::CoreError;
use lockerhub_core::locker_status::Actor;
use lockerhub_core::roles::ROLE_ADMIN;
use lockerhub_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Principal extracted from a JWT Bearer token in the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
}

impl AuthUser {
    /// The domain actor the rental services authorize against.
    pub fn actor(&self) -> Actor {
        if self.role == ROLE_ADMIN {
            Actor::Admin { id: self.user_id }
        } else {
            Actor::User { id: self.user_id }
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_follows_role() {
        let admin = AuthUser {
            user_id: 3,
            role: "admin".into(),
        };
        let user = AuthUser {
            user_id: 4,
            role: "user".into(),
        };
        assert_eq!(admin.actor(), Actor::Admin { id: 3 });
        assert_eq!(user.actor(), Actor::User { id: 4 });
    }
}
