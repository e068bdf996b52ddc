//! Axum-specific password reset route.

use axum::{Json, extract::State, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use taskforge_application::ResetPasswordUseCase;
use taskforge_core::{CredentialStore, OneTimeCode, Password, PasswordHasher, SessionStore};

use crate::error::ApiError;

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub code: String,
    pub new_password: Secret<String>,
}

#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password<C, S, H>(
    State((credential_store, session_store, password_hasher)): State<(C, S, H)>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CredentialStore + Clone + 'static,
    S: SessionStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
{
    let code = OneTimeCode::parse(&request.code)?;
    let new_password = Password::try_from(request.new_password)?;

    ResetPasswordUseCase::new(credential_store, session_store, password_hasher)
        .execute(&code, &new_password)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Password reset successfully. Please log in with your new password."
    })))
}
