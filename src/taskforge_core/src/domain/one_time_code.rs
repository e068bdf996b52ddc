use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum OneTimeCodeError {
    #[error("Code must be exactly 6 digits")]
    Invalid,
}

/// A 6-digit one-time code, used to prove control of an email address
/// during verification and password reset. Generated fresh per request,
/// single-use: the credential store clears it on consumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    /// Generate a fresh random code in `100000..=999999`.
    pub fn new() -> Self {
        Self(rand::rng().random_range(100_000..1_000_000).to_string())
    }

    pub fn parse(code: &str) -> Result<Self, OneTimeCodeError> {
        if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(code.to_owned()))
        } else {
            Err(OneTimeCodeError::Invalid)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OneTimeCode {
    fn default() -> Self {
        Self::new()
    }
}
