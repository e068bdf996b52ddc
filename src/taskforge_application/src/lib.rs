pub mod use_cases;

pub use use_cases::{
    get_user::{GetUserError, GetUserUseCase},
    login::{LoginError, LoginResponse, LoginUseCase},
    logout::{LogoutError, LogoutUseCase},
    refresh_session::{RefreshError, RefreshResponse, RefreshSessionUseCase},
    register::{RegisterError, RegisterUseCase, RegisteredUser},
    request_password_reset::{RequestPasswordResetError, RequestPasswordResetUseCase},
    resend_verification::{ResendVerificationError, ResendVerificationUseCase},
    reset_password::{ResetPasswordError, ResetPasswordUseCase},
    sessions::{
        ListSessionsUseCase, RevokeOtherSessionsUseCase, RevokeSessionUseCase, SessionsError,
    },
    todos::{TodoService, TodoServiceError},
    verify_email::{VerifyEmailError, VerifyEmailUseCase},
};

#[cfg(test)]
pub(crate) mod testing;
