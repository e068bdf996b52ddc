//! Axum-specific registration route.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use taskforge_application::RegisterUseCase;
use taskforge_core::{CredentialStore, Email, EmailClient, Password, PasswordHasher};

use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: Secret<String>,
    pub password: Secret<String>,
}

/// Creates an unverified account and mails its verification code. The code
/// itself is never part of the HTTP response - it only travels by email.
#[tracing::instrument(name = "Register", skip_all)]
pub async fn register<C, M, H>(
    State((credential_store, email_client, password_hasher)): State<(C, M, H)>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CredentialStore + Clone + 'static,
    M: EmailClient + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let registered = RegisterUseCase::new(credential_store, email_client, password_hasher)
        .execute(request.name, email, password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Registration successful. Please check your email for a verification code.",
            "user": registered.user,
        })),
    ))
}
