use taskforge_core::{CredentialStore, CredentialStoreError, OneTimeCode};

/// Error types specific to the verify email use case
#[derive(Debug, thiserror::Error)]
pub enum VerifyEmailError {
    #[error("Invalid or expired verification code")]
    InvalidCode,
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
}

/// Verify email use case - consumes a verification code and flips the
/// account verified. Codes are single-use: the store clears them here.
pub struct VerifyEmailUseCase<C>
where
    C: CredentialStore,
{
    credential_store: C,
}

impl<C> VerifyEmailUseCase<C>
where
    C: CredentialStore,
{
    pub fn new(credential_store: C) -> Self {
        Self { credential_store }
    }

    #[tracing::instrument(name = "VerifyEmailUseCase::execute", skip_all)]
    pub async fn execute(&self, code: &OneTimeCode) -> Result<(), VerifyEmailError> {
        let user = self
            .credential_store
            .find_by_verification_code(code.as_str())
            .await
            .map_err(|e| match e {
                CredentialStoreError::UserNotFound => VerifyEmailError::InvalidCode,
                other => VerifyEmailError::CredentialStoreError(other),
            })?;

        self.credential_store
            .mark_verified(user.id)
            .await
            .map_err(VerifyEmailError::CredentialStoreError)?;

        tracing::info!(user_id = user.id, "email verified");
        Ok(())
    }
}
