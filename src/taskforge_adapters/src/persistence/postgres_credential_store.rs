use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Pool, Postgres};

use taskforge_core::{CredentialStore, CredentialStoreError, Email, NewUser, User};

#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresCredentialStore { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    is_verified: bool,
    verification_code: Option<String>,
    verification_expires: Option<DateTime<Utc>>,
    reset_code: Option<String>,
    reset_expires: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, CredentialStoreError> {
        let email = Email::try_from(self.email)
            .map_err(|e| CredentialStoreError::UnexpectedError(e.to_string()))?;
        Ok(User {
            id: self.id,
            name: self.name,
            email,
            password_hash: Secret::from(self.password_hash),
            is_verified: self.is_verified,
            verification_code: self.verification_code,
            verification_expires: self.verification_expires,
            reset_code: self.reset_code,
            reset_expires: self.reset_expires,
            created_at: self.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, is_verified, verification_code, \
                            verification_expires, reset_code, reset_expires, created_at";

fn unexpected(e: sqlx::Error) -> CredentialStoreError {
    CredentialStoreError::UnexpectedError(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn create(&self, user: NewUser) -> Result<User, CredentialStoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
                INSERT INTO users (name, email, password_hash, is_verified,
                                   verification_code, verification_expires)
                VALUES ($1, $2, $3, FALSE, $4, $5)
                RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(user.email.expose())
        .bind(user.password_hash.expose_secret())
        .bind(&user.verification_code)
        .bind(user.verification_expires)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint().is_some() {
                    return CredentialStoreError::EmailTaken;
                }
            }
            unexpected(e)
        })?;

        row.into_user()
    }

    #[tracing::instrument(name = "Retrieving user by id from PostgreSQL", skip_all)]
    async fn find_by_id(&self, id: i64) -> Result<User, CredentialStoreError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or(CredentialStoreError::UserNotFound)?
            .into_user()
    }

    #[tracing::instrument(name = "Retrieving user by email from PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<User, CredentialStoreError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.expose())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(CredentialStoreError::UserNotFound)?
        .into_user()
    }

    #[tracing::instrument(name = "Looking up verification code in PostgreSQL", skip_all)]
    async fn find_by_verification_code(&self, code: &str) -> Result<User, CredentialStoreError> {
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
                SELECT {USER_COLUMNS} FROM users
                WHERE verification_code = $1 AND verification_expires > $2
            "#
        ))
        .bind(code)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(CredentialStoreError::UserNotFound)?
        .into_user()
    }

    #[tracing::instrument(name = "Looking up reset code in PostgreSQL", skip_all)]
    async fn find_by_reset_code(&self, code: &str) -> Result<User, CredentialStoreError> {
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
                SELECT {USER_COLUMNS} FROM users
                WHERE reset_code = $1 AND reset_expires > $2
            "#
        ))
        .bind(code)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(CredentialStoreError::UserNotFound)?
        .into_user()
    }

    #[tracing::instrument(name = "Setting verification code", skip_all)]
    async fn set_verification_code(
        &self,
        user_id: i64,
        code: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), CredentialStoreError> {
        let result = sqlx::query(
            "UPDATE users SET verification_code = $2, verification_expires = $3 WHERE id = $1",
        )
        .bind(user_id)
        .bind(code)
        .bind(expires)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Marking user verified", skip_all)]
    async fn mark_verified(&self, user_id: i64) -> Result<(), CredentialStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE users
                SET is_verified = TRUE, verification_code = NULL, verification_expires = NULL
                WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Setting reset code", skip_all)]
    async fn set_reset_code(
        &self,
        user_id: i64,
        code: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), CredentialStoreError> {
        let result =
            sqlx::query("UPDATE users SET reset_code = $2, reset_expires = $3 WHERE id = $1")
                .bind(user_id)
                .bind(code)
                .bind(expires)
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::UserNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Updating password hash", skip_all)]
    async fn update_password(
        &self,
        user_id: i64,
        password_hash: Secret<String>,
    ) -> Result<(), CredentialStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE users
                SET password_hash = $2, reset_code = NULL, reset_expires = NULL
                WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash.expose_secret())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::UserNotFound);
        }
        Ok(())
    }
}
