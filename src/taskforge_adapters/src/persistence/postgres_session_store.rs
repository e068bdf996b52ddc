use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};

use taskforge_core::{NewSession, Session, SessionStore, SessionStoreError};

#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresSessionStore { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i64,
    token: String,
    user_id: i64,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    revoked: bool,
    replaced_by: Option<String>,
    device_name: Option<String>,
    device_type: Option<String>,
    browser: Option<String>,
    ip_address: Option<String>,
    last_used: Option<DateTime<Utc>>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            token: row.token,
            user_id: row.user_id,
            expires_at: row.expires_at,
            created_at: row.created_at,
            revoked: row.revoked,
            replaced_by: row.replaced_by,
            device_name: row.device_name,
            device_type: row.device_type,
            browser: row.browser,
            ip_address: row.ip_address,
            last_used: row.last_used,
        }
    }
}

const SESSION_COLUMNS: &str = "id, token, user_id, expires_at, created_at, revoked, replaced_by, \
                               device_name, device_type, browser, ip_address, last_used";

fn unexpected(e: sqlx::Error) -> SessionStoreError {
    SessionStoreError::UnexpectedError(e.to_string())
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    #[tracing::instrument(name = "Persisting refresh token in PostgreSQL", skip_all)]
    async fn create(&self, session: NewSession) -> Result<Session, SessionStoreError> {
        let device = session.device.unwrap_or_default();
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
                INSERT INTO refresh_tokens
                    (token, user_id, expires_at, device_name, device_type, browser, ip_address)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(&device.device_name)
        .bind(&device.device_type)
        .bind(&device.browser)
        .bind(&device.ip_address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint().is_some() {
                    return SessionStoreError::TokenExists;
                }
            }
            unexpected(e)
        })?;

        Ok(row.into())
    }

    #[tracing::instrument(name = "Retrieving refresh token from PostgreSQL", skip_all)]
    async fn find_by_token(&self, token: &str) -> Result<Session, SessionStoreError> {
        sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM refresh_tokens WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(Session::from)
        .ok_or(SessionStoreError::SessionNotFound)
    }

    #[tracing::instrument(name = "Retrieving session by id from PostgreSQL", skip_all)]
    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Session, SessionStoreError> {
        sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM refresh_tokens WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(Session::from)
        .ok_or(SessionStoreError::SessionNotFound)
    }

    #[tracing::instrument(name = "Touching refresh token", skip_all)]
    async fn touch(&self, token: &str) -> Result<(), SessionStoreError> {
        let result = sqlx::query("UPDATE refresh_tokens SET last_used = $2 WHERE token = $1")
            .bind(token)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(SessionStoreError::SessionNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Revoking refresh token", skip_all)]
    async fn revoke(
        &self,
        token: &str,
        replaced_by: Option<&str>,
    ) -> Result<bool, SessionStoreError> {
        // Conditional update: the `revoked = FALSE` guard makes concurrent
        // rotations of one token race to a single winner.
        let result = sqlx::query(
            r#"
                UPDATE refresh_tokens
                SET revoked = TRUE, replaced_by = $2
                WHERE token = $1 AND revoked = FALSE
            "#,
        )
        .bind(token)
        .bind(replaced_by)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(result.rows_affected() == 1)
    }

    #[tracing::instrument(name = "Revoking all refresh tokens for user", skip_all)]
    async fn revoke_all_for_user(&self, user_id: i64) -> Result<(), SessionStoreError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Revoking other refresh tokens for user", skip_all)]
    async fn revoke_all_except(
        &self,
        user_id: i64,
        keep_token: &str,
    ) -> Result<(), SessionStoreError> {
        sqlx::query(
            r#"
                UPDATE refresh_tokens
                SET revoked = TRUE
                WHERE user_id = $1 AND token <> $2 AND revoked = FALSE
            "#,
        )
        .bind(user_id)
        .bind(keep_token)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Listing active sessions from PostgreSQL", skip_all)]
    async fn list_active_for_user(&self, user_id: i64) -> Result<Vec<Session>, SessionStoreError> {
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
                SELECT {SESSION_COLUMNS} FROM refresh_tokens
                WHERE user_id = $1 AND revoked = FALSE AND expires_at > $2
                ORDER BY COALESCE(last_used, created_at) DESC
            "#
        ))
        .bind(user_id)
        .bind(Utc::now())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(rows.into_iter().map(Session::from).collect())
    }

    #[tracing::instrument(name = "Purging expired refresh tokens", skip_all)]
    async fn purge_expired(&self) -> Result<u64, SessionStoreError> {
        let result =
            sqlx::query("DELETE FROM refresh_tokens WHERE revoked = TRUE AND expires_at < $1")
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;
        Ok(result.rows_affected())
    }
}
