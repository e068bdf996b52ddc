pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;
pub mod request_password_reset;
pub mod resend_verification;
pub mod reset_password;
pub mod sessions;
pub mod tags;
pub mod todos;
pub mod verify_email;
