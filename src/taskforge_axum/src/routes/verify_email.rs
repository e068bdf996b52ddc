//! Axum-specific email verification route.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use taskforge_application::VerifyEmailUseCase;
use taskforge_core::{CredentialStore, OneTimeCode};

use crate::error::ApiError;

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub code: String,
}

#[tracing::instrument(name = "Verify email", skip_all)]
pub async fn verify_email<C>(
    State(credential_store): State<C>,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CredentialStore + Clone + 'static,
{
    let code = OneTimeCode::parse(&request.code)?;

    VerifyEmailUseCase::new(credential_store)
        .execute(&code)
        .await?;

    Ok(Json(
        serde_json::json!({ "message": "Email verified successfully" }),
    ))
}
