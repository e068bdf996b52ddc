pub mod get_user;
pub mod login;
pub mod logout;
pub mod refresh_session;
pub mod register;
pub mod request_password_reset;
pub mod resend_verification;
pub mod reset_password;
pub mod sessions;
pub mod todos;
pub mod verify_email;

/// Lifetime of a freshly issued refresh token.
pub(crate) const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// A refresh with less than this much lifetime remaining is rotated onto a
/// fresh token; above it the presented token is handed back unchanged.
pub(crate) const ROTATION_THRESHOLD_DAYS: i64 = 7;

/// Validity window of an email-verification code.
pub(crate) const VERIFICATION_CODE_TTL_HOURS: i64 = 24;

/// Validity window of a password-reset code.
pub(crate) const RESET_CODE_TTL_HOURS: i64 = 1;
