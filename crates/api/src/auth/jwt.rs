//! Access tokens minted by the identity service.
//!
//! Lockers are rented and returned on behalf of whoever the bearer token
//! names. Verification pins HS256 and requires an expiry. Revocation stays
//! with the identity service.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lockerhub_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a renter or operator token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Identity-service user id; becomes the locker occupant on rent.
    pub sub: DbId,
    /// `"admin"` for operators, `"user"` for renters.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Shared secret and lifetime for locally minted tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default `15`).
    ///
    /// # Panics
    ///
    /// Panics on a missing or empty secret, or a non-integer expiry.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// HS256 only, `exp` required. A missing `sub` fails deserialization.
fn validation() -> Validation {
    Validation::new(Algorithm::HS256)
}

/// Mint a token for `user_id` with the given role.
///
/// The service itself never issues tokens at runtime; integration tests and
/// operator scripts holding the shared secret do.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: iat + config.access_token_expiry_mins * 60,
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &config.encoding_key())
}

/// Verify signature, algorithm and expiry, then return the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(token, &config.decoding_key(), &validation()).map(|data| data.claims)
}
