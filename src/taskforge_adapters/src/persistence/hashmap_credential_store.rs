use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use tokio::sync::RwLock;

use taskforge_core::{CredentialStore, CredentialStoreError, Email, NewUser, User};

/// In-memory credential store. Backs the integration tests and local runs
/// without a database; semantics match the Postgres implementation.
#[derive(Clone, Default)]
pub struct HashMapCredentialStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl HashMapCredentialStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl CredentialStore for HashMapCredentialStore {
    async fn create(&self, user: NewUser) -> Result<User, CredentialStoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(CredentialStoreError::EmailTaken);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            is_verified: false,
            verification_code: Some(user.verification_code),
            verification_expires: Some(user.verification_expires),
            reset_code: None,
            reset_expires: None,
            created_at: Utc::now(),
        };
        users.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, CredentialStoreError> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CredentialStoreError::UserNotFound)
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, CredentialStoreError> {
        self.users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned()
            .ok_or(CredentialStoreError::UserNotFound)
    }

    async fn find_by_verification_code(&self, code: &str) -> Result<User, CredentialStoreError> {
        let now = Utc::now();
        self.users
            .read()
            .await
            .values()
            .find(|u| {
                u.verification_code.as_deref() == Some(code)
                    && u.verification_expires.is_some_and(|exp| exp > now)
            })
            .cloned()
            .ok_or(CredentialStoreError::UserNotFound)
    }

    async fn find_by_reset_code(&self, code: &str) -> Result<User, CredentialStoreError> {
        let now = Utc::now();
        self.users
            .read()
            .await
            .values()
            .find(|u| {
                u.reset_code.as_deref() == Some(code)
                    && u.reset_expires.is_some_and(|exp| exp > now)
            })
            .cloned()
            .ok_or(CredentialStoreError::UserNotFound)
    }

    async fn set_verification_code(
        &self,
        user_id: i64,
        code: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), CredentialStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or(CredentialStoreError::UserNotFound)?;
        user.verification_code = Some(code.to_owned());
        user.verification_expires = Some(expires);
        Ok(())
    }

    async fn mark_verified(&self, user_id: i64) -> Result<(), CredentialStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or(CredentialStoreError::UserNotFound)?;
        user.is_verified = true;
        user.verification_code = None;
        user.verification_expires = None;
        Ok(())
    }

    async fn set_reset_code(
        &self,
        user_id: i64,
        code: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), CredentialStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or(CredentialStoreError::UserNotFound)?;
        user.reset_code = Some(code.to_owned());
        user.reset_expires = Some(expires);
        Ok(())
    }

    async fn update_password(
        &self,
        user_id: i64,
        password_hash: Secret<String>,
    ) -> Result<(), CredentialStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or(CredentialStoreError::UserNotFound)?;
        user.password_hash = password_hash;
        user.reset_code = None;
        user.reset_expires = None;
        Ok(())
    }
}
