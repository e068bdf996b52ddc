use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher as _, SaltString, rand_core},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

use taskforge_core::{Password, PasswordHasher};

/// Argon2id password hasher tuned for tens of milliseconds per hash.
/// Hashing runs on the blocking pool so it never stalls the executor.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<Secret<String>, String> {
        let password = password.clone();
        let current_span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let salt = SaltString::generate(rand_core::OsRng);
                hasher()?
                    .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                    .map(|h| Secret::from(h.to_string()))
                    .map_err(|e| e.to_string())
            })
        })
        .await
        .map_err(|e| e.to_string())?
    }

    #[tracing::instrument(name = "Verifying password hash", skip_all)]
    async fn verify(&self, password: &Password, hash: &Secret<String>) -> Result<bool, String> {
        let password = password.clone();
        let expected = hash.clone();
        let current_span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let expected =
                    PasswordHash::new(expected.expose_secret()).map_err(|e| e.to_string())?;
                Ok(hasher()?
                    .verify_password(password.as_ref().expose_secret().as_bytes(), &expected)
                    .is_ok())
            })
        })
        .await
        .map_err(|e| e.to_string())?
    }
}

fn hasher() -> Result<Argon2<'static>, String> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).map_err(|e| e.to_string())?,
    ))
}
