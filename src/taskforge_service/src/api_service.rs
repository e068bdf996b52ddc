use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use taskforge_adapters::JwtConfig;
use taskforge_axum::routes::{
    login::login,
    logout::logout,
    me::me,
    refresh::refresh,
    register::register,
    request_password_reset::request_password_reset,
    resend_verification::resend_verification,
    reset_password::reset_password,
    sessions::{list_sessions, revoke_other_sessions, revoke_session},
    tags::{
        create_tag, delete_tag_by_id, delete_tag_by_name, list_tags, todos_by_tag, unused_tags,
        used_tags,
    },
    todos::{complete_todo, create_todo, delete_todo, get_todo, list_todos, update_todo},
    verify_email::verify_email,
};
use taskforge_core::{
    CredentialStore, EmailClient, PasswordHasher, SessionStore, TagStore, TodoStore,
};

use crate::telemetry::{make_span_with_request_id, on_request, on_response};

/// The full HTTP API: authentication, session management, todos, and tags.
///
/// Generic over the store and service ports so the same wiring serves the
/// Postgres adapters in production and the in-memory adapters in tests.
/// Each route is given exactly the state it needs.
pub struct ApiService {
    router: Router,
}

impl ApiService {
    pub fn new<C, S, T, G, M, H>(
        credential_store: C,
        session_store: S,
        todo_store: T,
        tag_store: G,
        email_client: M,
        password_hasher: H,
        jwt_config: JwtConfig,
    ) -> Self
    where
        C: CredentialStore + Clone + 'static,
        S: SessionStore + Clone + 'static,
        T: TodoStore + Clone + 'static,
        G: TagStore + Clone + 'static,
        M: EmailClient + Clone + 'static,
        H: PasswordHasher + Clone + 'static,
    {
        let router = Router::new()
            // Registration needs credentials, mail, and hashing
            .route("/auth/register", post(register::<C, M, H>))
            .with_state((
                credential_store.clone(),
                email_client.clone(),
                password_hasher.clone(),
            ))
            // Verification only needs the credential store
            .route("/auth/verify-email", post(verify_email::<C>))
            .with_state(credential_store.clone())
            // Login opens a session and mints an access token
            .route("/auth/login", post(login::<C, S, H>))
            .with_state((
                credential_store.clone(),
                session_store.clone(),
                password_hasher.clone(),
                jwt_config.clone(),
            ))
            // Refresh re-validates the session and may rotate it
            .route("/auth/refresh-token", post(refresh::<C, S>))
            .with_state((
                credential_store.clone(),
                session_store.clone(),
                jwt_config.clone(),
            ))
            // Logout only needs the session store
            .route("/auth/logout", post(logout::<S>))
            .with_state(session_store.clone())
            // Code (re)delivery endpoints need credentials and mail
            .route(
                "/auth/resend-verification",
                post(resend_verification::<C, M>),
            )
            .route(
                "/auth/request-password-reset",
                post(request_password_reset::<C, M>),
            )
            .with_state((credential_store.clone(), email_client))
            // Reset invalidates every session of the user
            .route("/auth/reset-password", post(reset_password::<C, S, H>))
            .with_state((
                credential_store.clone(),
                session_store.clone(),
                password_hasher,
            ))
            .route("/auth/me", get(me::<C>))
            .with_state((credential_store, jwt_config.clone()))
            // Session introspection and revocation
            .route(
                "/auth/sessions",
                get(list_sessions::<S>).delete(revoke_other_sessions::<S>),
            )
            .route("/auth/sessions/{id}", delete(revoke_session::<S>))
            .with_state((session_store, jwt_config.clone()))
            // Todos and tags, all ownership-scoped
            .route("/todos", get(list_todos::<T, G>).post(create_todo::<T, G>))
            .route(
                "/todos/{id}",
                get(get_todo::<T, G>)
                    .put(update_todo::<T, G>)
                    .delete(delete_todo::<T, G>),
            )
            .route("/todos/{id}/complete", put(complete_todo::<T, G>))
            .route("/tags", get(list_tags::<T, G>).post(create_tag::<T, G>))
            .route("/tags/used", get(used_tags::<T, G>))
            .route("/tags/unused", get(unused_tags::<T, G>))
            .route("/tags/containing/{name}", get(todos_by_tag::<T, G>))
            .route("/tags/id/{id}", delete(delete_tag_by_id::<T, G>))
            .route("/tags/name/{name}", delete(delete_tag_by_name::<T, G>))
            .with_state((todo_store, tag_store, jwt_config))
            .route("/health", get(health));

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// The assembled router, ready to serve or to drive directly in tests.
    pub fn router(self) -> Router {
        let cors = CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any);

        self.with_trace_layer().router.layer(cors)
    }

    /// Run as a standalone server on the given listener.
    pub async fn run_standalone(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let router = self.router();

        tracing::info!("Taskforge API listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await
    }
}

async fn health() -> &'static str {
    "ok"
}
