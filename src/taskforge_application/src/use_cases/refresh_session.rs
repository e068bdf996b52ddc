use chrono::Utc;

use taskforge_core::{
    CredentialStore, CredentialStoreError, NewSession, PublicUser, SessionStore,
    SessionStoreError, generate_session_token,
};

use crate::use_cases::{REFRESH_TOKEN_TTL_DAYS, ROTATION_THRESHOLD_DAYS};

/// Response from a successful refresh. `refresh_token` is either the
/// presented token (no rotation) or a freshly minted replacement.
#[derive(Debug)]
pub struct RefreshResponse {
    pub user: PublicUser,
    pub refresh_token: String,
    pub rotated: bool,
}

/// Error types specific to the refresh use case
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Invalid refresh token")]
    InvalidToken,
    #[error("Refresh token has been revoked")]
    Revoked,
    #[error("Refresh token has expired")]
    Expired,
    #[error("User not found")]
    UserNotFound,
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Refresh use case - validates a presented refresh token and renews the
/// session.
///
/// Sliding-window rotation: a token with less than seven days of life left
/// is replaced by a fresh 30-day token and revoked with a pointer to its
/// replacement; otherwise the presented token is returned unchanged.
pub struct RefreshSessionUseCase<C, S>
where
    C: CredentialStore,
    S: SessionStore,
{
    credential_store: C,
    session_store: S,
}

impl<C, S> RefreshSessionUseCase<C, S>
where
    C: CredentialStore,
    S: SessionStore,
{
    pub fn new(credential_store: C, session_store: S) -> Self {
        Self {
            credential_store,
            session_store,
        }
    }

    #[tracing::instrument(name = "RefreshSessionUseCase::execute", skip_all)]
    pub async fn execute(&self, token: &str) -> Result<RefreshResponse, RefreshError> {
        let session = match self.session_store.find_by_token(token).await {
            Ok(session) => session,
            Err(SessionStoreError::SessionNotFound) => return Err(RefreshError::InvalidToken),
            Err(e) => return Err(e.into()),
        };

        if session.revoked {
            // A revoked token being presented again is a replay signal -
            // logged apart from plain not-found.
            tracing::warn!(
                session_id = session.id,
                user_id = session.user_id,
                "revoked refresh token presented"
            );
            return Err(RefreshError::Revoked);
        }

        let now = Utc::now();
        if session.expires_at < now {
            return Err(RefreshError::Expired);
        }

        let user = match self.credential_store.find_by_id(session.user_id).await {
            Ok(user) => user,
            Err(CredentialStoreError::UserNotFound) => return Err(RefreshError::UserNotFound),
            Err(e) => return Err(RefreshError::CredentialStoreError(e)),
        };

        self.session_store.touch(token).await?;

        if session.expires_at < now + chrono::Duration::days(ROTATION_THRESHOLD_DAYS) {
            let new_token = generate_session_token();

            // The replacement must be durable before the old token is
            // revoked; a crash in between leaves the old token usable
            // rather than locking the session out.
            self.session_store
                .create(NewSession {
                    token: new_token.clone(),
                    user_id: user.id,
                    expires_at: now + chrono::Duration::days(REFRESH_TOKEN_TTL_DAYS),
                    device: Some(session.device_info()),
                })
                .await?;

            let won = self.session_store.revoke(token, Some(&new_token)).await?;
            if !won {
                // A concurrent refresh rotated this token first. Discard
                // our replacement and reject like any other revoked token.
                self.session_store.revoke(&new_token, None).await?;
                tracing::warn!(session_id = session.id, "lost refresh rotation race");
                return Err(RefreshError::Revoked);
            }

            tracing::debug!(session_id = session.id, "refresh token rotated");

            Ok(RefreshResponse {
                user: user.to_public(),
                refresh_token: new_token,
                rotated: true,
            })
        } else {
            Ok(RefreshResponse {
                user: user.to_public(),
                refresh_token: token.to_owned(),
                rotated: false,
            })
        }
    }
}
