use chrono::Utc;

use taskforge_core::{
    CredentialStore, CredentialStoreError, Email, EmailClient, EmailTemplate, OneTimeCode,
};

use crate::use_cases::VERIFICATION_CODE_TTL_HOURS;

/// Error types specific to the resend verification use case
#[derive(Debug, thiserror::Error)]
pub enum ResendVerificationError {
    #[error("User not found")]
    UserNotFound,
    #[error("Email already verified")]
    AlreadyVerified,
    #[error("Failed to send email: {0}")]
    EmailError(String),
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
}

/// Resend verification use case - issues a fresh code for an unverified
/// account, superseding any previous one.
pub struct ResendVerificationUseCase<C, M>
where
    C: CredentialStore,
    M: EmailClient,
{
    credential_store: C,
    email_client: M,
}

impl<C, M> ResendVerificationUseCase<C, M>
where
    C: CredentialStore,
    M: EmailClient,
{
    pub fn new(credential_store: C, email_client: M) -> Self {
        Self {
            credential_store,
            email_client,
        }
    }

    #[tracing::instrument(name = "ResendVerificationUseCase::execute", skip_all)]
    pub async fn execute(&self, email: &Email) -> Result<(), ResendVerificationError> {
        let user = self
            .credential_store
            .find_by_email(email)
            .await
            .map_err(|e| match e {
                CredentialStoreError::UserNotFound => ResendVerificationError::UserNotFound,
                other => ResendVerificationError::CredentialStoreError(other),
            })?;

        if user.is_verified {
            return Err(ResendVerificationError::AlreadyVerified);
        }

        let code = OneTimeCode::new();
        let expires = Utc::now() + chrono::Duration::hours(VERIFICATION_CODE_TTL_HOURS);

        self.credential_store
            .set_verification_code(user.id, code.as_str(), expires)
            .await
            .map_err(ResendVerificationError::CredentialStoreError)?;

        self.email_client
            .send_code(&user.email, &user.name, EmailTemplate::VerifyEmail, &code)
            .await
            .map_err(ResendVerificationError::EmailError)?;

        tracing::info!(user_id = user.id, "verification email resent");
        Ok(())
    }
}
