//! JWT (JSON Web Token) utilities for authentication.
//!
//! Tokens are HS256-signed with the configured secret and expire after
//! `JWT_ACCESS_EXPIRY` seconds.
//!
//! # Example
//!
//! ```ignore
//! use sisprof_auth::{create_access_token, verify_token};
//! use sisprof_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(account_id, "ana", vec![Role::Student], &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use sisprof_config::JwtConfig;
use sisprof_core::{AppError, Role};

use crate::claims::Claims;

/// Creates an access token carrying the account's roles.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    account_id: Uuid,
    username: &str,
    roles: Vec<Role>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: account_id.to_string(),
        username: username.to_string(),
        roles,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired or it is malformed.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}
