//! Axum-specific login route.

use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};
use secrecy::Secret;
use serde::{Deserialize, Serialize};

use taskforge_adapters::{JwtConfig, issue_access_token};
use taskforge_application::LoginUseCase;
use taskforge_core::{
    CredentialStore, Email, Password, PasswordHasher, PublicUser, SessionStore, TokenPayload,
};

use crate::error::ApiError;
use crate::extract::device_info;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[derive(Serialize)]
pub struct LoginResponseBody {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Authenticates credentials and opens a device-tagged session, returning
/// the access/refresh token pair.
#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<C, S, H>(
    State((credential_store, session_store, password_hasher, jwt_config)): State<(
        C,
        S,
        H,
        JwtConfig,
    )>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CredentialStore + Clone + 'static,
    S: SessionStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;
    let device = device_info(&headers);

    let response = LoginUseCase::new(credential_store, session_store, password_hasher)
        .execute(&email, &password, Some(device))
        .await?;

    let access_token = issue_access_token(
        &TokenPayload {
            user_id: response.user.id,
            email: response.user.email.clone(),
        },
        &jwt_config,
    )?;

    Ok(Json(LoginResponseBody {
        access_token,
        refresh_token: response.refresh_token,
        user: response.user,
    }))
}
