//! Axum-specific current-user route.

use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};

use taskforge_adapters::JwtConfig;
use taskforge_application::GetUserUseCase;
use taskforge_core::CredentialStore;

use crate::error::ApiError;
use crate::extract::authenticate;

#[tracing::instrument(name = "Get current user", skip_all)]
pub async fn me<C>(
    State((credential_store, jwt_config)): State<(C, JwtConfig)>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    C: CredentialStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;

    let user = GetUserUseCase::new(credential_store)
        .execute(payload.user_id)
        .await?;

    Ok(Json(user))
}
