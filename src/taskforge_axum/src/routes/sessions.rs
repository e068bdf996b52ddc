//! Axum-specific session management routes.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use taskforge_adapters::JwtConfig;
use taskforge_application::{
    ListSessionsUseCase, RevokeOtherSessionsUseCase, RevokeSessionUseCase,
};
use taskforge_core::SessionStore;

use crate::error::ApiError;
use crate::extract::authenticate;

/// The caller's active sessions, most recently used first.
#[tracing::instrument(name = "List sessions", skip_all)]
pub async fn list_sessions<S>(
    State((session_store, jwt_config)): State<(S, JwtConfig)>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    S: SessionStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;

    let sessions = ListSessionsUseCase::new(session_store)
        .execute(payload.user_id)
        .await?;

    Ok(Json(sessions))
}

/// Revoke one of the caller's sessions by id. A session id belonging to
/// someone else gets a 404, exactly like an id that does not exist.
#[tracing::instrument(name = "Revoke session", skip_all, fields(session_id))]
pub async fn revoke_session<S>(
    State((session_store, jwt_config)): State<(S, JwtConfig)>,
    headers: HeaderMap,
    Path(session_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    S: SessionStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;

    RevokeSessionUseCase::new(session_store)
        .execute(session_id, payload.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RevokeOtherSessionsRequest {
    /// The caller's own refresh token; its session is the one kept alive.
    pub refresh_token: String,
}

#[tracing::instrument(name = "Revoke other sessions", skip_all)]
pub async fn revoke_other_sessions<S>(
    State((session_store, jwt_config)): State<(S, JwtConfig)>,
    headers: HeaderMap,
    Json(request): Json<RevokeOtherSessionsRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: SessionStore + Clone + 'static,
{
    let payload = authenticate(&headers, &jwt_config)?;

    RevokeOtherSessionsUseCase::new(session_store)
        .execute(payload.user_id, &request.refresh_token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
