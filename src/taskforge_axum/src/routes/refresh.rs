//! Axum-specific token refresh route.

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use taskforge_adapters::{JwtConfig, issue_access_token};
use taskforge_application::RefreshSessionUseCase;
use taskforge_core::{CredentialStore, SessionStore, TokenPayload};

use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponseBody {
    pub access_token: String,
    pub refresh_token: String,
}

/// Exchanges a refresh token for a fresh access token; the refresh token
/// itself may rotate when it nears expiry.
#[tracing::instrument(name = "Refresh token", skip_all)]
pub async fn refresh<C, S>(
    State((credential_store, session_store, jwt_config)): State<(C, S, JwtConfig)>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: CredentialStore + Clone + 'static,
    S: SessionStore + Clone + 'static,
{
    let response = RefreshSessionUseCase::new(credential_store, session_store)
        .execute(&request.refresh_token)
        .await?;

    let access_token = issue_access_token(
        &TokenPayload {
            user_id: response.user.id,
            email: response.user.email.clone(),
        },
        &jwt_config,
    )?;

    Ok(Json(RefreshResponseBody {
        access_token,
        refresh_token: response.refresh_token,
    }))
}
