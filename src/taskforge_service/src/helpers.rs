use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};

use taskforge_adapters::config::DatabaseSettings;

/// Configure and return a PostgreSQL connection pool.
///
/// Creates the pool from the configured URL and runs all pending
/// migrations.
///
/// # Panics
/// Panics if unable to create the pool or run migrations.
pub async fn configure_postgresql(settings: &DatabaseSettings) -> PgPool {
    let pool = get_postgres_pool(settings.url.expose_secret(), settings.max_connections)
        .await
        .expect("Failed to create Postgres connection pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Create a PostgreSQL connection pool.
pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}
