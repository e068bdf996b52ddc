//! Axum-specific password-reset request route.

use axum::{Json, extract::State, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use taskforge_application::RequestPasswordResetUseCase;
use taskforge_core::{CredentialStore, Email, EmailClient};

use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RequestPasswordResetRequest {
    pub email: Secret<String>,
}

/// Always answers the same way, whether or not the email is registered.
#[tracing::instrument(name = "Request password reset", skip_all)]
pub async fn request_password_reset<C, M>(
    State((credential_store, email_client)): State<(C, M)>,
    Json(request): Json<RequestPasswordResetRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CredentialStore + Clone + 'static,
    M: EmailClient + Clone + 'static,
{
    let email = Email::try_from(request.email)?;

    RequestPasswordResetUseCase::new(credential_store, email_client)
        .execute(&email)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "If that email is registered, a reset code has been sent"
    })))
}
