use chrono::Utc;

use taskforge_core::{
    CredentialStore, CredentialStoreError, DeviceInfo, Email, NewSession, Password,
    PasswordHasher, PublicUser, SessionStore, SessionStoreError, generate_session_token,
};

use crate::use_cases::REFRESH_TOKEN_TTL_DAYS;

/// Response from a successful login. The HTTP layer mints the short-lived
/// access token from `user`; the refresh token is the opaque session
/// credential persisted here.
#[derive(Debug)]
pub struct LoginResponse {
    pub user: PublicUser,
    pub refresh_token: String,
}

/// Error types specific to the login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Covers both unknown email and wrong password, so a caller cannot
    /// probe which emails are registered.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email not verified")]
    EmailNotVerified,
    #[error("Password verification failed: {0}")]
    HashError(String),
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Login use case - authenticates credentials and opens a session.
pub struct LoginUseCase<C, S, H>
where
    C: CredentialStore,
    S: SessionStore,
    H: PasswordHasher,
{
    credential_store: C,
    session_store: S,
    password_hasher: H,
}

impl<C, S, H> LoginUseCase<C, S, H>
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

    /// `device` is the classified caller context from the device-aware
    /// variant; plain logins pass `None`.
    #[tracing::instrument(name = "LoginUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: &Email,
        password: &Password,
        device: Option<DeviceInfo>,
    ) -> Result<LoginResponse, LoginError> {
        let user = match self.credential_store.find_by_email(email).await {
            Ok(user) => user,
            Err(CredentialStoreError::UserNotFound) => return Err(LoginError::InvalidCredentials),
            Err(e) => return Err(LoginError::CredentialStoreError(e)),
        };

        // Checked before the password so an account that cannot log in
        // anyway does not cost a hash comparison. Unverified-but-existing
        // is not a secret.
        if !user.is_verified {
            return Err(LoginError::EmailNotVerified);
        }

        let password_valid = self
            .password_hasher
            .verify(password, &user.password_hash)
            .await
            .map_err(LoginError::HashError)?;
        if !password_valid {
            return Err(LoginError::InvalidCredentials);
        }

        let refresh_token = generate_session_token();
        self.session_store
            .create(NewSession {
                token: refresh_token.clone(),
                user_id: user.id,
                expires_at: Utc::now() + chrono::Duration::days(REFRESH_TOKEN_TTL_DAYS),
                device,
            })
            .await?;

        tracing::info!(user_id = user.id, "user logged in");

        Ok(LoginResponse {
            user: user.to_public(),
            refresh_token,
        })
    }
}
