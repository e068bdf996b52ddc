use taskforge_core::{SessionStore, SessionStoreError};

/// Error types specific to the logout use case
#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Logout use case - revokes the presented refresh token.
///
/// Idempotent: revoking a missing or already-revoked token is not an error
/// at this layer.
pub struct LogoutUseCase<S>
where
    S: SessionStore,
{
    session_store: S,
}

impl<S> LogoutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: S) -> Self {
        Self { session_store }
    }

    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all)]
    pub async fn execute(&self, token: &str) -> Result<(), LogoutError> {
        let revoked = self.session_store.revoke(token, None).await?;
        if revoked {
            tracing::info!("session revoked on logout");
        }
        Ok(())
    }
}
