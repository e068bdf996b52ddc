use taskforge_core::{
    CredentialStore, CredentialStoreError, OneTimeCode, Password, PasswordHasher, SessionStore,
    SessionStoreError,
};

/// Error types specific to the reset password use case
#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    #[error("Invalid or expired reset code")]
    InvalidCode,
    #[error("Password hashing failed: {0}")]
    HashError(String),
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Reset password use case - consumes a reset code, replaces the password
/// hash, and revokes every session the user has. The full revocation is a
/// security invariant of password change, not an optimization.
pub struct ResetPasswordUseCase<C, S, H>
where
    C: CredentialStore,
    S: SessionStore,
    H: PasswordHasher,
{
    credential_store: C,
    session_store: S,
    password_hasher: H,
}

impl<C, S, H> ResetPasswordUseCase<C, S, H>
where
    C: CredentialStore,
    S: SessionStore,
    H: PasswordHasher,
{
    pub fn new(credential_store: C, session_store: S, password_hasher: H) -> Self {
        Self {
            credential_store,
            session_store,
            password_hasher,
        }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        code: &OneTimeCode,
        new_password: &Password,
    ) -> Result<(), ResetPasswordError> {
        let user = self
            .credential_store
            .find_by_reset_code(code.as_str())
            .await
            .map_err(|e| match e {
                CredentialStoreError::UserNotFound => ResetPasswordError::InvalidCode,
                other => ResetPasswordError::CredentialStoreError(other),
            })?;

        let password_hash = self
            .password_hasher
            .hash(new_password)
            .await
            .map_err(ResetPasswordError::HashError)?;

        // update_password also clears the consumed reset code.
        self.credential_store
            .update_password(user.id, password_hash)
            .await
            .map_err(ResetPasswordError::CredentialStoreError)?;

        self.session_store.revoke_all_for_user(user.id).await?;

        tracing::info!(user_id = user.id, "password reset; all sessions revoked");
        Ok(())
    }
}
