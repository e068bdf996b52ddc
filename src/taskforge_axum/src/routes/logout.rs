//! Axum-specific logout route.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use taskforge_application::LogoutUseCase;
use taskforge_core::SessionStore;

use crate::error::ApiError;

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Revokes the presented refresh token. Succeeds whether or not a live
/// token was supplied.
#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout<S>(
    State(session_store): State<S>,
    Json(request): Json<LogoutRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: SessionStore + Clone + 'static,
{
    if let Some(token) = request.refresh_token {
        LogoutUseCase::new(session_store).execute(&token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
