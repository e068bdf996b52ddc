//! # Taskforge - Multi-tenant Todo API
//!
//! This is a facade crate that re-exports the public APIs of the taskforge
//! workspace members. Use this crate to get access to the whole service in
//! one place.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `User`, `Session`,
//!   `OneTimeCode`, `Todo`, `Tag`, etc.
//! - **Store ports**: `CredentialStore`, `SessionStore`, `TodoStore`,
//!   `TagStore`, plus the `EmailClient` and `PasswordHasher` capabilities
//! - **Use cases**: `RegisterUseCase`, `LoginUseCase`,
//!   `RefreshSessionUseCase`, etc.
//! - **Adapters**: `PostgresCredentialStore`, `HashMapSessionStore`,
//!   `PostmarkEmailClient`, `Argon2PasswordHasher`, JWT helpers
//! - **Service**: `ApiService` - the assembled HTTP API

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and ports
pub mod core {
    pub use taskforge_core::*;
}

// Re-export most commonly used core types at the root level
pub use taskforge_core::{
    DeviceInfo, Email, NewSession, NewTodo, NewUser, OneTimeCode, Password, Priority, PublicUser,
    Session, SessionSummary, Tag, TagWithCount, Todo, TodoPatch, TokenPayload, User,
};

// ============================================================================
// Store Ports
// ============================================================================

pub use taskforge_core::{
    CredentialStore, CredentialStoreError, EmailClient, EmailTemplate, PasswordHasher,
    SessionStore, SessionStoreError, TagStore, TagStoreError, TodoStore, TodoStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use taskforge_application::*;
}

// Re-export use cases at root level
pub use taskforge_application::{
    GetUserUseCase, ListSessionsUseCase, LoginUseCase, LogoutUseCase, RefreshSessionUseCase,
    RegisterUseCase, RequestPasswordResetUseCase, ResendVerificationUseCase,
    ResetPasswordUseCase, RevokeOtherSessionsUseCase, RevokeSessionUseCase, TodoService,
    VerifyEmailUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use taskforge_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use taskforge_adapters::email::*;
    }

    /// Password hashing and JWT utilities
    pub mod auth {
        pub use taskforge_adapters::auth::*;
    }

    /// Configuration
    pub mod config {
        pub use taskforge_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use taskforge_adapters::{
    Argon2PasswordHasher, HashMapCredentialStore, HashMapSessionStore, HashMapTagStore,
    HashMapTodoStore, JwtConfig, PostgresCredentialStore, PostgresSessionStore, PostgresTagStore,
    PostgresTodoStore, PostmarkEmailClient, RecordingEmailClient, Settings, issue_access_token,
    validate_access_token,
};

// ============================================================================
// HTTP Layer and Service
// ============================================================================

/// Axum routes and HTTP error mapping
pub mod http_api {
    pub use taskforge_axum::*;
}

pub use taskforge_axum::ApiError;

/// Main API service
pub use taskforge_service::{
    ApiService, configure_postgresql, get_postgres_pool, init_tracing, spawn_session_sweeper,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing store ports
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
