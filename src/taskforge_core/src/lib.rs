pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    device::DeviceInfo,
    email::{Email, EmailError},
    one_time_code::{OneTimeCode, OneTimeCodeError},
    password::{Password, PasswordError},
    session::{NewSession, Session, SessionSummary, generate_session_token},
    tag::{Tag, TagWithCount},
    todo::{NewTodo, Priority, Todo, TodoPatch},
    token::TokenPayload,
    user::{NewUser, PublicUser, User},
};

pub use ports::{
    services::{EmailClient, EmailTemplate, PasswordHasher},
    stores::{
        CredentialStore, CredentialStoreError, SessionStore, SessionStoreError, TagStore,
        TagStoreError, TodoStore, TodoStoreError,
    },
};
