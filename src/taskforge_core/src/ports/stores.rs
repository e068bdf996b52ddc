use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    email::Email,
    session::{NewSession, Session},
    tag::Tag,
    todo::{NewTodo, Todo, TodoPatch},
    user::{NewUser, User},
};

// CredentialStore port trait and errors
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("A user with this email already exists")]
    EmailTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for CredentialStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::EmailTaken, Self::EmailTaken)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Persistence contract for user credential records.
///
/// The store enforces email uniqueness; the engine relies on `EmailTaken`
/// rather than racing a lookup against an insert. Code lookups only match
/// rows whose expiry is still in the future.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, CredentialStoreError>;

    async fn find_by_id(&self, id: i64) -> Result<User, CredentialStoreError>;

    async fn find_by_email(&self, email: &Email) -> Result<User, CredentialStoreError>;

    /// Find the user whose active (unexpired) verification code matches.
    async fn find_by_verification_code(&self, code: &str) -> Result<User, CredentialStoreError>;

    /// Find the user whose active (unexpired) reset code matches.
    async fn find_by_reset_code(&self, code: &str) -> Result<User, CredentialStoreError>;

    async fn set_verification_code(
        &self,
        user_id: i64,
        code: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), CredentialStoreError>;

    /// Mark the user verified and clear the verification code and expiry.
    async fn mark_verified(&self, user_id: i64) -> Result<(), CredentialStoreError>;

    async fn set_reset_code(
        &self,
        user_id: i64,
        code: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), CredentialStoreError>;

    /// Replace the password hash and clear any pending reset code.
    async fn update_password(
        &self,
        user_id: i64,
        password_hash: Secret<String>,
    ) -> Result<(), CredentialStoreError>;
}

// SessionStore port trait and errors
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Refresh token already exists")]
    TokenExists,
    #[error("Session not found")]
    SessionNotFound,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for SessionStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::TokenExists, Self::TokenExists)
                | (Self::SessionNotFound, Self::SessionNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Persistence contract for refresh-token records.
///
/// Token values are unique and never reused; `revoked` is never cleared.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: NewSession) -> Result<Session, SessionStoreError>;

    async fn find_by_token(&self, token: &str) -> Result<Session, SessionStoreError>;

    /// Owner-scoped lookup by session id. A session belonging to another
    /// user is reported as `SessionNotFound`.
    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Session, SessionStoreError>;

    /// Update `last_used` to now.
    async fn touch(&self, token: &str) -> Result<(), SessionStoreError>;

    /// Conditionally revoke: only a currently-unrevoked token is revoked,
    /// optionally recording the token that replaces it. Returns whether
    /// this call performed the revocation (`false` for a missing or
    /// already-revoked token), so concurrent rotations of the same token
    /// have at most one winner.
    async fn revoke(
        &self,
        token: &str,
        replaced_by: Option<&str>,
    ) -> Result<bool, SessionStoreError>;

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<(), SessionStoreError>;

    async fn revoke_all_except(
        &self,
        user_id: i64,
        keep_token: &str,
    ) -> Result<(), SessionStoreError>;

    /// Unrevoked, unexpired sessions, most recently used first.
    async fn list_active_for_user(&self, user_id: i64) -> Result<Vec<Session>, SessionStoreError>;

    /// Delete sessions that are both expired and revoked. Revoked but
    /// unexpired tokens are retained so replay of a rotated token can
    /// still be detected. Returns the number of rows removed.
    async fn purge_expired(&self) -> Result<u64, SessionStoreError>;
}

// TodoStore port trait and errors
#[derive(Debug, Error)]
pub enum TodoStoreError {
    #[error("Todo not found")]
    TodoNotFound,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for TodoStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::TodoNotFound, Self::TodoNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Persistence contract for todos. Every operation is scoped to the owning
/// user; a todo owned by someone else behaves as if it did not exist.
/// Tags arrive pre-resolved so the store only maintains the links.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>, TodoStoreError>;

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError>;

    async fn create(
        &self,
        user_id: i64,
        todo: NewTodo,
        tags: &[Tag],
    ) -> Result<Todo, TodoStoreError>;

    /// `tags` of `None` leaves the tag set unchanged; `Some` replaces it.
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: TodoPatch,
        tags: Option<&[Tag]>,
    ) -> Result<Todo, TodoStoreError>;

    async fn delete(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError>;

    /// Mark completed and stamp `completed_at`.
    async fn mark_complete(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError>;

    async fn list_by_tag(&self, tag_id: i64, user_id: i64) -> Result<Vec<Todo>, TodoStoreError>;
}

// TagStore port trait and errors
#[derive(Debug, Error)]
pub enum TagStoreError {
    #[error("Tag not found")]
    TagNotFound,
    #[error("Tag already exists")]
    TagExists,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for TagStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::TagNotFound, Self::TagNotFound)
                | (Self::TagExists, Self::TagExists)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Persistence contract for tags. Names are unique per user.
#[async_trait]
pub trait TagStore: Send + Sync {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Tag>, TagStoreError>;

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Tag, TagStoreError>;

    async fn find_by_name(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError>;

    async fn find_or_create(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError>;

    async fn create(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError>;

    async fn delete(&self, id: i64, user_id: i64) -> Result<Tag, TagStoreError>;
}
