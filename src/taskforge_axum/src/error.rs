use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use taskforge_adapters::AccessTokenError;
use taskforge_application::{
    GetUserError, LoginError, LogoutError, RefreshError, RegisterError,
    RequestPasswordResetError, ResendVerificationError, ResetPasswordError, SessionsError,
    TodoServiceError, VerifyEmailError,
};
use taskforge_core::{EmailError, OneTimeCodeError, PasswordError};

/// The HTTP layer's error taxonomy. Use-case errors map into one of these
/// kinds; the kinds map onto status codes. Store and delivery failures
/// collapse into `Internal` so no backend detail leaks to callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<EmailError> for ApiError {
    fn from(e: EmailError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<OneTimeCodeError> for ApiError {
    fn from(e: OneTimeCodeError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<AccessTokenError> for ApiError {
    fn from(e: AccessTokenError) -> Self {
        match e {
            AccessTokenError::Invalid => ApiError::Authentication(e.to_string()),
            AccessTokenError::UnexpectedError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(e: RegisterError) -> Self {
        match e {
            RegisterError::EmailTaken => ApiError::Validation(e.to_string()),
            RegisterError::HashError(_)
            | RegisterError::EmailError(_)
            | RegisterError::CredentialStoreError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<VerifyEmailError> for ApiError {
    fn from(e: VerifyEmailError) -> Self {
        match e {
            VerifyEmailError::InvalidCode => ApiError::Validation(e.to_string()),
            VerifyEmailError::CredentialStoreError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ResendVerificationError> for ApiError {
    fn from(e: ResendVerificationError) -> Self {
        match e {
            ResendVerificationError::UserNotFound => ApiError::NotFound(e.to_string()),
            ResendVerificationError::AlreadyVerified => ApiError::Validation(e.to_string()),
            ResendVerificationError::EmailError(_)
            | ResendVerificationError::CredentialStoreError(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::InvalidCredentials | LoginError::EmailNotVerified => {
                ApiError::Authentication(e.to_string())
            }
            LoginError::HashError(_)
            | LoginError::CredentialStoreError(_)
            | LoginError::SessionStoreError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<RefreshError> for ApiError {
    fn from(e: RefreshError) -> Self {
        match e {
            RefreshError::InvalidToken
            | RefreshError::Revoked
            | RefreshError::Expired
            | RefreshError::UserNotFound => ApiError::Authentication(e.to_string()),
            RefreshError::CredentialStoreError(_) | RefreshError::SessionStoreError(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<LogoutError> for ApiError {
    fn from(e: LogoutError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<RequestPasswordResetError> for ApiError {
    fn from(e: RequestPasswordResetError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ResetPasswordError> for ApiError {
    fn from(e: ResetPasswordError) -> Self {
        match e {
            ResetPasswordError::InvalidCode => ApiError::Validation(e.to_string()),
            ResetPasswordError::HashError(_)
            | ResetPasswordError::CredentialStoreError(_)
            | ResetPasswordError::SessionStoreError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SessionsError> for ApiError {
    fn from(e: SessionsError) -> Self {
        match e {
            SessionsError::SessionNotFound => ApiError::NotFound(e.to_string()),
            SessionsError::SessionStoreError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<GetUserError> for ApiError {
    fn from(e: GetUserError) -> Self {
        match e {
            GetUserError::UserNotFound => ApiError::NotFound(e.to_string()),
            GetUserError::CredentialStoreError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<TodoServiceError> for ApiError {
    fn from(e: TodoServiceError) -> Self {
        match e {
            TodoServiceError::TodoNotFound | TodoServiceError::TagNotFound => {
                ApiError::NotFound(e.to_string())
            }
            TodoServiceError::TagExists | TodoServiceError::TagInUse(_) => {
                ApiError::Validation(e.to_string())
            }
            TodoServiceError::TodoStoreError(_) | TodoServiceError::TagStoreError(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}
