use taskforge_core::{SessionStore, SessionStoreError, SessionSummary};

/// Error types shared by the session management use cases
#[derive(Debug, thiserror::Error)]
pub enum SessionsError {
    /// Also covers sessions owned by another user: a non-owner gets the
    /// same answer as for an id that never existed.
    #[error("Session not found")]
    SessionNotFound,
    #[error("Session store error: {0}")]
    SessionStoreError(SessionStoreError),
}

impl From<SessionStoreError> for SessionsError {
    fn from(e: SessionStoreError) -> Self {
        match e {
            SessionStoreError::SessionNotFound => SessionsError::SessionNotFound,
            other => SessionsError::SessionStoreError(other),
        }
    }
}

/// List sessions use case - the caller's active sessions, most recently
/// used first, with device metadata defaults filled in.
pub struct ListSessionsUseCase<S>
where
    S: SessionStore,
{
    session_store: S,
}

impl<S> ListSessionsUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: S) -> Self {
        Self { session_store }
    }

    #[tracing::instrument(name = "ListSessionsUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: i64) -> Result<Vec<SessionSummary>, SessionsError> {
        let sessions = self.session_store.list_active_for_user(user_id).await?;
        Ok(sessions.iter().map(|s| s.to_summary()).collect())
    }
}

/// Revoke session use case - revokes one of the caller's own sessions by
/// id.
pub struct RevokeSessionUseCase<S>
where
    S: SessionStore,
{
    session_store: S,
}

impl<S> RevokeSessionUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: S) -> Self {
        Self { session_store }
    }

    #[tracing::instrument(name = "RevokeSessionUseCase::execute", skip(self))]
    pub async fn execute(&self, session_id: i64, user_id: i64) -> Result<(), SessionsError> {
        let session = self.session_store.find_for_user(session_id, user_id).await?;
        self.session_store.revoke(&session.token, None).await?;
        tracing::info!(session_id, user_id, "session revoked");
        Ok(())
    }
}

/// Revoke other sessions use case - revokes every session of the caller
/// except the one presenting `current_token`, so the acting session
/// survives.
pub struct RevokeOtherSessionsUseCase<S>
where
    S: SessionStore,
{
    session_store: S,
}

impl<S> RevokeOtherSessionsUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: S) -> Self {
        Self { session_store }
    }

    #[tracing::instrument(name = "RevokeOtherSessionsUseCase::execute", skip_all)]
    pub async fn execute(&self, user_id: i64, current_token: &str) -> Result<(), SessionsError> {
        self.session_store
            .revoke_all_except(user_id, current_token)
            .await?;
        tracing::info!(user_id, "other sessions revoked");
        Ok(())
    }
}
