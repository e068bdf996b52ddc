use chrono::Utc;

use taskforge_core::{
    CredentialStore, CredentialStoreError, Email, EmailClient, EmailTemplate, OneTimeCode,
};

use crate::use_cases::RESET_CODE_TTL_HOURS;

/// Error types specific to the request password reset use case
#[derive(Debug, thiserror::Error)]
pub enum RequestPasswordResetError {
    #[error("Failed to send email: {0}")]
    EmailError(String),
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
}

/// Request password reset use case - issues a short-lived reset code.
///
/// Requests for unknown emails resolve silently so the endpoint cannot be
/// used to enumerate accounts.
pub struct RequestPasswordResetUseCase<C, M>
where
    C: CredentialStore,
    M: EmailClient,
{
    credential_store: C,
    email_client: M,
}

impl<C, M> RequestPasswordResetUseCase<C, M>
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

    #[tracing::instrument(name = "RequestPasswordResetUseCase::execute", skip_all)]
    pub async fn execute(&self, email: &Email) -> Result<(), RequestPasswordResetError> {
        let user = match self.credential_store.find_by_email(email).await {
            Ok(user) => user,
            Err(CredentialStoreError::UserNotFound) => return Ok(()),
            Err(e) => return Err(RequestPasswordResetError::CredentialStoreError(e)),
        };

        let code = OneTimeCode::new();
        let expires = Utc::now() + chrono::Duration::hours(RESET_CODE_TTL_HOURS);

        self.credential_store
            .set_reset_code(user.id, code.as_str(), expires)
            .await
            .map_err(RequestPasswordResetError::CredentialStoreError)?;

        self.email_client
            .send_code(&user.email, &user.name, EmailTemplate::ResetPassword, &code)
            .await
            .map_err(RequestPasswordResetError::EmailError)?;

        tracing::info!(user_id = user.id, "password reset requested");
        Ok(())
    }
}
