use std::time::Duration;

use reqwest::Client;
use secrecy::Secret;
use tokio::net::TcpListener;

use taskforge_adapters::{
    Argon2PasswordHasher, JwtConfig, PostgresCredentialStore, PostgresSessionStore,
    PostgresTagStore, PostgresTodoStore, PostmarkEmailClient, Settings,
};
use taskforge_core::Email;
use taskforge_service::{ApiService, configure_postgresql, init_tracing, spawn_session_sweeper};

/// How often the background sweep deletes expired, revoked sessions.
const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = Settings::load()?;

    let pool = configure_postgresql(&settings.database).await;
    let credential_store = PostgresCredentialStore::new(pool.clone());
    let session_store = PostgresSessionStore::new(pool.clone());
    let todo_store = PostgresTodoStore::new(pool.clone());
    let tag_store = PostgresTagStore::new(pool);

    let sender = Email::try_from(Secret::from(settings.email.sender.clone()))
        .expect("configured email sender must be a valid address");
    let email_client = PostmarkEmailClient::new(
        settings.email.base_url.clone(),
        sender,
        settings.email.authorization_token.clone(),
        Client::new(),
    );

    let jwt_config = JwtConfig {
        jwt_secret: settings.jwt.secret.clone(),
        token_ttl_in_seconds: settings.jwt.access_token_ttl_seconds,
    };

    spawn_session_sweeper(session_store.clone(), SESSION_SWEEP_PERIOD);

    let listener = TcpListener::bind((
        settings.application.host.as_str(),
        settings.application.port,
    ))
    .await?;

    ApiService::new(
        credential_store,
        session_store,
        todo_store,
        tag_store,
        email_client,
        Argon2PasswordHasher::new(),
        jwt_config,
    )
    .run_standalone(listener)
    .await?;

    Ok(())
}
