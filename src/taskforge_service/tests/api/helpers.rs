use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::Secret;
use serde_json::{Value, json};
use tower::ServiceExt;

use taskforge_adapters::{
    Argon2PasswordHasher, HashMapCredentialStore, HashMapSessionStore, HashMapTagStore,
    HashMapTodoStore, JwtConfig, RecordingEmailClient,
};
use taskforge_service::ApiService;

/// The full API wired against in-memory adapters, plus handles to the
/// stores and the recording mailer for assertions and fixtures.
pub struct TestApp {
    pub router: Router,
    pub session_store: HashMapSessionStore,
    pub mailer: RecordingEmailClient,
}

impl TestApp {
    pub fn spawn() -> Self {
        let credential_store = HashMapCredentialStore::new();
        let session_store = HashMapSessionStore::new();
        let todo_store = HashMapTodoStore::new();
        let tag_store = HashMapTagStore::new();
        let mailer = RecordingEmailClient::new();

        let jwt_config = JwtConfig {
            jwt_secret: Secret::from("test-secret".to_owned()),
            token_ttl_in_seconds: 600,
        };

        let router = ApiService::new(
            credential_store,
            session_store.clone(),
            todo_store,
            tag_store,
            mailer.clone(),
            Argon2PasswordHasher::new(),
            jwt_config,
        )
        .router();

        Self {
            router,
            session_store,
            mailer,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Register an account and verify it with the emailed code.
    pub async fn register_and_verify(&self, name: &str, email: &str, password: &str) {
        let (status, _) = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let code = self.mailer.last_code().await;
        let (status, _) = self
            .request(
                "POST",
                "/auth/verify-email",
                None,
                Some(json!({ "code": code.as_str() })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Log in and return `(access_token, refresh_token, user_id)`.
    pub async fn login(&self, email: &str, password: &str) -> (String, String, i64) {
        let (status, body) = self
            .request(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");

        (
            body["access_token"].as_str().unwrap().to_owned(),
            body["refresh_token"].as_str().unwrap().to_owned(),
            body["user"]["id"].as_i64().unwrap(),
        )
    }
}
