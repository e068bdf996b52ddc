use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskforge_core::TokenPayload;

#[derive(Clone)]
pub struct JwtConfig {
    pub jwt_secret: Secret<String>,
    pub token_ttl_in_seconds: i64,
}

#[derive(Debug, Error, PartialEq)]
pub enum AccessTokenError {
    /// Malformed, badly signed, and expired tokens all collapse here - the
    /// caller is never told which check failed.
    #[error("Invalid or expired token")]
    Invalid,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Signed claims carried by an access token. Stateless: validity is purely
/// signature + expiry.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    email: String,
    exp: usize,
}

/// Mint a short-lived access token for the given identity.
pub fn issue_access_token(
    payload: &TokenPayload,
    config: &JwtConfig,
) -> Result<String, AccessTokenError> {
    let delta = chrono::Duration::try_seconds(config.token_ttl_in_seconds).ok_or(
        AccessTokenError::UnexpectedError("Failed to create token duration".to_owned()),
    )?;

    let exp = Utc::now()
        .checked_add_signed(delta)
        .ok_or(AccessTokenError::UnexpectedError(
            "Duration out of range".to_owned(),
        ))?
        .timestamp();

    let exp: usize = exp
        .try_into()
        .map_err(|_| AccessTokenError::UnexpectedError("Failed to cast i64 to usize".to_owned()))?;

    let claims = Claims {
        sub: payload.user_id,
        email: payload.email.clone(),
        exp,
    };

    encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AccessTokenError::UnexpectedError(e.to_string()))
}

/// Check signature and expiry, returning the asserted identity.
pub fn validate_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenPayload, AccessTokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| TokenPayload {
        user_id: data.claims.sub,
        email: data.claims.email,
    })
    .map_err(|_| AccessTokenError::Invalid)
}
