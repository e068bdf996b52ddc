pub mod auth;
pub mod config;
pub mod email;
pub mod persistence;

pub use auth::{
    argon2_password_hasher::Argon2PasswordHasher,
    jwt::{AccessTokenError, JwtConfig, issue_access_token, validate_access_token},
};
pub use config::Settings;
pub use email::{
    postmark_email_client::PostmarkEmailClient, recording_email_client::RecordingEmailClient,
};
pub use persistence::{
    hashmap_credential_store::HashMapCredentialStore,
    hashmap_session_store::HashMapSessionStore,
    hashmap_todo_store::{HashMapTagStore, HashMapTodoStore},
    postgres_credential_store::PostgresCredentialStore,
    postgres_session_store::PostgresSessionStore,
    postgres_todo_store::{PostgresTagStore, PostgresTodoStore},
};
