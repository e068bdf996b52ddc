use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use taskforge_core::{NewSession, Session, SessionStore, SessionStoreError};

/// In-memory session store, keyed by the opaque token value.
#[derive(Clone, Default)]
pub struct HashMapSessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    next_id: Arc<AtomicI64>,
}

impl HashMapSessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl SessionStore for HashMapSessionStore {
    async fn create(&self, session: NewSession) -> Result<Session, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.token) {
            return Err(SessionStoreError::TokenExists);
        }
        let device = session.device.unwrap_or_default();
        let record = Session {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            token: session.token.clone(),
            user_id: session.user_id,
            expires_at: session.expires_at,
            created_at: Utc::now(),
            revoked: false,
            replaced_by: None,
            device_name: device.device_name,
            device_type: device.device_type,
            browser: device.browser,
            ip_address: device.ip_address,
            last_used: None,
        };
        sessions.insert(session.token, record.clone());
        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Session, SessionStoreError> {
        self.sessions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(SessionStoreError::SessionNotFound)
    }

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Session, SessionStoreError> {
        self.sessions
            .read()
            .await
            .values()
            .find(|s| s.id == id && s.user_id == user_id)
            .cloned()
            .ok_or(SessionStoreError::SessionNotFound)
    }

    async fn touch(&self, token: &str) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(token)
            .ok_or(SessionStoreError::SessionNotFound)?;
        session.last_used = Some(Utc::now());
        Ok(())
    }

    async fn revoke(
        &self,
        token: &str,
        replaced_by: Option<&str>,
    ) -> Result<bool, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token).filter(|s| !s.revoked) {
            Some(session) => {
                session.revoked = true;
                session.replaced_by = replaced_by.map(str::to_owned);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        for session in sessions.values_mut().filter(|s| s.user_id == user_id) {
            session.revoked = true;
        }
        Ok(())
    }

    async fn revoke_all_except(
        &self,
        user_id: i64,
        keep_token: &str,
    ) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        for session in sessions
            .values_mut()
            .filter(|s| s.user_id == user_id && s.token != keep_token)
        {
            session.revoked = true;
        }
        Ok(())
    }

    async fn list_active_for_user(&self, user_id: i64) -> Result<Vec<Session>, SessionStoreError> {
        let now = Utc::now();
        let mut active: Vec<Session> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id && !s.revoked && s.expires_at > now)
            .cloned()
            .collect();
        active.sort_by_key(|s| std::cmp::Reverse(s.last_used.unwrap_or(s.created_at)));
        Ok(active)
    }

    async fn purge_expired(&self) -> Result<u64, SessionStoreError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !(s.revoked && s.expires_at < now));
        Ok((before - sessions.len()) as u64)
    }
}
