use taskforge_core::{CredentialStore, CredentialStoreError, PublicUser};

/// Error types specific to the get user use case
#[derive(Debug, thiserror::Error)]
pub enum GetUserError {
    #[error("User not found")]
    UserNotFound,
    #[error("Credential store error: {0}")]
    CredentialStoreError(CredentialStoreError),
}

/// Get user use case - a user by id, with credential fields stripped.
pub struct GetUserUseCase<C>
where
    C: CredentialStore,
{
    credential_store: C,
}

impl<C> GetUserUseCase<C>
where
    C: CredentialStore,
{
    pub fn new(credential_store: C) -> Self {
        Self { credential_store }
    }

    #[tracing::instrument(name = "GetUserUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: i64) -> Result<PublicUser, GetUserError> {
        let user = self
            .credential_store
            .find_by_id(user_id)
            .await
            .map_err(|e| match e {
                CredentialStoreError::UserNotFound => GetUserError::UserNotFound,
                other => GetUserError::CredentialStoreError(other),
            })?;
        Ok(user.to_public())
    }
}
