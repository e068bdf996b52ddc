//! In-memory test doubles for the use-case tests. Behaviour mirrors the
//! store contracts closely enough that the same flows pass against the
//! real adapters.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

use taskforge_core::{
    CredentialStore, CredentialStoreError, Email, EmailClient, EmailTemplate, NewSession,
    NewTodo, NewUser, OneTimeCode, Password, PasswordHasher, Session, SessionStore,
    SessionStoreError, Tag, TagStore, TagStoreError, Todo, TodoPatch, TodoStore, TodoStoreError,
    User,
};

pub fn email(address: &str) -> Email {
    Email::try_from(address.to_string()).unwrap()
}

pub fn password(raw: &str) -> Password {
    Password::try_from(raw.to_string()).unwrap()
}

#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn get(&self, id: i64) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, user: NewUser) -> Result<User, CredentialStoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(CredentialStoreError::EmailTaken);
        }
        let record = User {
            id: users.len() as i64 + 1,
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
        users.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, CredentialStoreError> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(CredentialStoreError::UserNotFound)
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, CredentialStoreError> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| &u.email == email)
            .cloned()
            .ok_or(CredentialStoreError::UserNotFound)
    }

    async fn find_by_verification_code(&self, code: &str) -> Result<User, CredentialStoreError> {
        let now = Utc::now();
        self.users
            .read()
            .await
            .iter()
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
            .iter()
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
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(CredentialStoreError::UserNotFound)?;
        user.verification_code = Some(code.to_owned());
        user.verification_expires = Some(expires);
        Ok(())
    }

    async fn mark_verified(&self, user_id: i64) -> Result<(), CredentialStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
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
            .iter_mut()
            .find(|u| u.id == user_id)
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
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(CredentialStoreError::UserNotFound)?;
        user.password_hash = password_hash;
        user.reset_code = None;
        user.reset_expires = None;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<Vec<Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_by_token(&self, token: &str) -> Option<Session> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|s| s.token == token)
            .cloned()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: NewSession) -> Result<Session, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.iter().any(|s| s.token == session.token) {
            return Err(SessionStoreError::TokenExists);
        }
        let device = session.device.unwrap_or_default();
        let record = Session {
            id: sessions.len() as i64 + 1,
            token: session.token,
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
        sessions.push(record.clone());
        Ok(record)
    }

    async fn find_by_token(&self, token: &str) -> Result<Session, SessionStoreError> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|s| s.token == token)
            .cloned()
            .ok_or(SessionStoreError::SessionNotFound)
    }

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Session, SessionStoreError> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|s| s.id == id && s.user_id == user_id)
            .cloned()
            .ok_or(SessionStoreError::SessionNotFound)
    }

    async fn touch(&self, token: &str) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .iter_mut()
            .find(|s| s.token == token)
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
        match sessions.iter_mut().find(|s| s.token == token && !s.revoked) {
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
        for session in sessions.iter_mut().filter(|s| s.user_id == user_id) {
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
            .iter_mut()
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
            .iter()
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
        sessions.retain(|s| !(s.revoked && s.expires_at < now));
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub recipient: String,
    pub recipient_name: String,
    pub template: EmailTemplate,
    pub code: OneTimeCode,
}

/// Email double that records every delivery so tests can read the code
/// back out, and can be flipped into a failing state.
#[derive(Clone, Default)]
pub struct RecordingEmailClient {
    sent: Arc<RwLock<Vec<SentEmail>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.read().await.clone()
    }

    pub async fn last_code(&self) -> OneTimeCode {
        self.sent
            .read()
            .await
            .last()
            .expect("no email was sent")
            .code
            .clone()
    }
}

#[async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_code(
        &self,
        recipient: &Email,
        recipient_name: &str,
        template: EmailTemplate,
        code: &OneTimeCode,
    ) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("email delivery failed".to_owned());
        }
        self.sent.write().await.push(SentEmail {
            recipient: recipient.expose().to_owned(),
            recipient_name: recipient_name.to_owned(),
            template,
            code: code.clone(),
        });
        Ok(())
    }
}

#[derive(Clone)]
struct TodoRecord {
    todo: Todo,
    tag_ids: Vec<i64>,
}

#[derive(Clone, Default)]
pub struct InMemoryTodoStore {
    todos: Arc<RwLock<Vec<TodoRecord>>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>, TodoStoreError> {
        Ok(self
            .todos
            .read()
            .await
            .iter()
            .filter(|r| r.todo.user_id == user_id)
            .map(|r| r.todo.clone())
            .collect())
    }

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        self.todos
            .read()
            .await
            .iter()
            .find(|r| r.todo.id == id && r.todo.user_id == user_id)
            .map(|r| r.todo.clone())
            .ok_or(TodoStoreError::TodoNotFound)
    }

    async fn create(
        &self,
        user_id: i64,
        todo: NewTodo,
        tags: &[Tag],
    ) -> Result<Todo, TodoStoreError> {
        let mut todos = self.todos.write().await;
        let record = TodoRecord {
            todo: Todo {
                id: todos.len() as i64 + 1,
                user_id,
                title: todo.title,
                description: todo.description,
                completed: false,
                created_at: Utc::now(),
                due_date: todo.due_date,
                completed_at: None,
                priority: todo.priority.unwrap_or_default(),
                image_urls: todo.image_urls,
                tags: tags.iter().map(|t| t.name.clone()).collect(),
            },
            tag_ids: tags.iter().map(|t| t.id).collect(),
        };
        todos.push(record.clone());
        Ok(record.todo)
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: TodoPatch,
        tags: Option<&[Tag]>,
    ) -> Result<Todo, TodoStoreError> {
        let mut todos = self.todos.write().await;
        let record = todos
            .iter_mut()
            .find(|r| r.todo.id == id && r.todo.user_id == user_id)
            .ok_or(TodoStoreError::TodoNotFound)?;
        if let Some(title) = patch.title {
            record.todo.title = title;
        }
        if let Some(description) = patch.description {
            record.todo.description = Some(description);
        }
        if let Some(completed) = patch.completed {
            record.todo.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            record.todo.due_date = Some(due_date);
        }
        if let Some(priority) = patch.priority {
            record.todo.priority = priority;
        }
        if let Some(image_urls) = patch.image_urls {
            record.todo.image_urls = image_urls;
        }
        if let Some(tags) = tags {
            record.todo.tags = tags.iter().map(|t| t.name.clone()).collect();
            record.tag_ids = tags.iter().map(|t| t.id).collect();
        }
        Ok(record.todo.clone())
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        let mut todos = self.todos.write().await;
        let index = todos
            .iter()
            .position(|r| r.todo.id == id && r.todo.user_id == user_id)
            .ok_or(TodoStoreError::TodoNotFound)?;
        Ok(todos.remove(index).todo)
    }

    async fn mark_complete(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        let mut todos = self.todos.write().await;
        let record = todos
            .iter_mut()
            .find(|r| r.todo.id == id && r.todo.user_id == user_id)
            .ok_or(TodoStoreError::TodoNotFound)?;
        record.todo.completed = true;
        record.todo.completed_at = Some(Utc::now());
        Ok(record.todo.clone())
    }

    async fn list_by_tag(&self, tag_id: i64, user_id: i64) -> Result<Vec<Todo>, TodoStoreError> {
        Ok(self
            .todos
            .read()
            .await
            .iter()
            .filter(|r| r.todo.user_id == user_id && r.tag_ids.contains(&tag_id))
            .map(|r| r.todo.clone())
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTagStore {
    tags: Arc<RwLock<Vec<Tag>>>,
}

impl InMemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TagStore for InMemoryTagStore {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Tag>, TagStoreError> {
        Ok(self
            .tags
            .read()
            .await
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Tag, TagStoreError> {
        self.tags
            .read()
            .await
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned()
            .ok_or(TagStoreError::TagNotFound)
    }

    async fn find_by_name(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError> {
        self.tags
            .read()
            .await
            .iter()
            .find(|t| t.name == name && t.user_id == user_id)
            .cloned()
            .ok_or(TagStoreError::TagNotFound)
    }

    async fn find_or_create(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError> {
        let mut tags = self.tags.write().await;
        if let Some(tag) = tags
            .iter()
            .find(|t| t.name == name && t.user_id == user_id)
        {
            return Ok(tag.clone());
        }
        let tag = Tag {
            id: tags.len() as i64 + 1,
            user_id,
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        tags.push(tag.clone());
        Ok(tag)
    }

    async fn create(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError> {
        let mut tags = self.tags.write().await;
        if tags.iter().any(|t| t.name == name && t.user_id == user_id) {
            return Err(TagStoreError::TagExists);
        }
        let tag = Tag {
            id: tags.len() as i64 + 1,
            user_id,
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        tags.push(tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<Tag, TagStoreError> {
        let mut tags = self.tags.write().await;
        let index = tags
            .iter()
            .position(|t| t.id == id && t.user_id == user_id)
            .ok_or(TagStoreError::TagNotFound)?;
        Ok(tags.remove(index))
    }
}

/// Cheap stand-in for the argon2 hasher: reversible on purpose so tests
/// stay fast while credential comparison still goes through the port.
#[derive(Clone, Default)]
pub struct FakePasswordHasher;

#[async_trait]
impl PasswordHasher for FakePasswordHasher {
    async fn hash(&self, password: &Password) -> Result<Secret<String>, String> {
        Ok(Secret::from(format!(
            "fake-hash:{}",
            password.as_ref().expose_secret()
        )))
    }

    async fn verify(&self, password: &Password, hash: &Secret<String>) -> Result<bool, String> {
        Ok(hash.expose_secret()
            == &format!("fake-hash:{}", password.as_ref().expose_secret()))
    }
}
