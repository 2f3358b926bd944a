//! Access-token helpers.
//!
//! Tokens are HS256 JWTs. The subject carries the username and `exp`
//! is validated on decode, so an expired token fails verification
//! without any extra bookkeeping.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when issuing or verifying access tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token creation failed: {0}")]
    TokenCreation(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Result type for token operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated user.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Issues an access token for a username, valid for `expire_minutes`.
pub fn create_access_token(username: &str, secret: &str, expire_minutes: i64) -> Result<String> {
    let claims = Claims {
        sub: username.to_string(),
        exp: (Utc::now() + Duration::minutes(expire_minutes)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenCreation(e.to_string()))
}

/// Decodes and validates an access token, returning its claims.
pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AuthError::InvalidToken(e.to_string()))
}
