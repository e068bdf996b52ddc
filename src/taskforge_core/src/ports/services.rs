use async_trait::async_trait;
use secrecy::Secret;

use crate::domain::{email::Email, one_time_code::OneTimeCode, password::Password};

/// Which one-time-code email to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    VerifyEmail,
    ResetPassword,
}

/// Outbound email delivery. The engine awaits every send; a failed send
/// fails the operation that requested it.
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_code(
        &self,
        recipient: &Email,
        recipient_name: &str,
        template: EmailTemplate,
        code: &OneTimeCode,
    ) -> Result<(), String>;
}

/// Slow, salted one-way password hashing. Deliberately distinct from
/// session-token and one-time-code generation: a password hash is never a
/// token and vice versa.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<Secret<String>, String>;

    /// `Ok(false)` is a mismatch; `Err` is an operational failure.
    async fn verify(&self, password: &Password, hash: &Secret<String>) -> Result<bool, String>;
}
