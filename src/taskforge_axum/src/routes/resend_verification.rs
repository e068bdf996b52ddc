//! Axum-specific resend-verification route.

use axum::{Json, extract::State, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;

use taskforge_application::ResendVerificationUseCase;
use taskforge_core::{CredentialStore, Email, EmailClient};

use crate::error::ApiError;

#[derive(Deserialize)]
pub struct ResendVerificationRequest {
    pub email: Secret<String>,
}

#[tracing::instrument(name = "Resend verification", skip_all)]
pub async fn resend_verification<C, M>(
    State((credential_store, email_client)): State<(C, M)>,
    Json(request): Json<ResendVerificationRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CredentialStore + Clone + 'static,
    M: EmailClient + Clone + 'static,
{
    let email = Email::try_from(request.email)?;

    ResendVerificationUseCase::new(credential_store, email_client)
        .execute(&email)
        .await?;

    Ok(Json(
        serde_json::json!({ "message": "Verification email sent" }),
    ))
}
