use axum::http::HeaderMap;

use taskforge_adapters::{JwtConfig, validate_access_token};
use taskforge_core::{DeviceInfo, TokenPayload};

use crate::error::ApiError;

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Authentication("Authorization header is required".to_owned()))?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Authentication(
            "Authorization header must be in format: Bearer [token]".to_owned(),
        )
    })
}

/// Authenticate a request from its headers: bearer extraction plus access
/// token validation. Returns the identity asserted by the token.
pub fn authenticate(headers: &HeaderMap, config: &JwtConfig) -> Result<TokenPayload, ApiError> {
    let token = bearer_token(headers)?;
    Ok(validate_access_token(token, config)?)
}

/// Classify the calling device from request headers, for the device-aware
/// login variant. The client IP is taken from `X-Forwarded-For` when the
/// service sits behind a proxy.
pub fn device_info(headers: &HeaderMap) -> DeviceInfo {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_owned());

    DeviceInfo::from_user_agent(user_agent, ip_address)
}
