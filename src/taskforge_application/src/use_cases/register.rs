use chrono::Utc;

use taskforge_core::{
    CredentialStore, CredentialStoreError, Email, EmailClient, EmailTemplate, NewUser,
    OneTimeCode, Password, PasswordHasher, PublicUser,
};

use crate::use_cases::VERIFICATION_CODE_TTL_HOURS;

/// Response from a successful registration. The code is returned for the
/// caller's convenience (tests, logging); clients only ever receive it by
/// email.
#[derive(Debug)]
pub struct RegisteredUser {
    pub user: PublicUser,
    pub verification_code: OneTimeCode,
}

/// Error types specific to the register use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("A user with this email already exists")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashError(String),
    #[error("Failed to send email: {0}")]
    EmailError(String),
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
}

/// Register use case - creates an unverified account and mails the
/// verification code.
///
/// The user row and its code commit before the email goes out; if delivery
/// then fails the error propagates but the account stays recoverable via
/// resend-verification.
pub struct RegisterUseCase<C, M, H>
where
    C: CredentialStore,
    M: EmailClient,
    H: PasswordHasher,
{
    credential_store: C,
    email_client: M,
    password_hasher: H,
}

impl<C, M, H> RegisterUseCase<C, M, H>
where
    C: CredentialStore,
    M: EmailClient,
    H: PasswordHasher,
{
    pub fn new(credential_store: C, email_client: M, password_hasher: H) -> Self {
        Self {
            credential_store,
            email_client,
            password_hasher,
        }
    }

    #[tracing::instrument(name = "RegisterUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        name: String,
        email: Email,
        password: Password,
    ) -> Result<RegisteredUser, RegisterError> {
        // Duplicate check before the expensive hash; the store's unique
        // constraint still backstops a concurrent registration.
        match self.credential_store.find_by_email(&email).await {
            Ok(_) => return Err(RegisterError::EmailTaken),
            Err(CredentialStoreError::UserNotFound) => {}
            Err(e) => return Err(RegisterError::CredentialStoreError(e)),
        }

        let password_hash = self
            .password_hasher
            .hash(&password)
            .await
            .map_err(RegisterError::HashError)?;

        let code = OneTimeCode::new();
        let expires = Utc::now() + chrono::Duration::hours(VERIFICATION_CODE_TTL_HOURS);

        let user = self
            .credential_store
            .create(NewUser {
                name,
                email,
                password_hash,
                verification_code: code.as_str().to_owned(),
                verification_expires: expires,
            })
            .await
            .map_err(|e| match e {
                CredentialStoreError::EmailTaken => RegisterError::EmailTaken,
                other => RegisterError::CredentialStoreError(other),
            })?;

        self.email_client
            .send_code(&user.email, &user.name, EmailTemplate::VerifyEmail, &code)
            .await
            .map_err(RegisterError::EmailError)?;

        tracing::info!(user_id = user.id, "user registered");

        Ok(RegisteredUser {
            user: user.to_public(),
            verification_code: code,
        })
    }
}
