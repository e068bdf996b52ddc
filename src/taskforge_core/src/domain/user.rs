use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::Serialize;

use crate::domain::email::Email;

/// A user credential record as persisted by the credential store.
///
/// `verification_code`/`reset_code` and their expiries are set when a code
/// is issued and cleared (NULL) once consumed or superseded.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Email,
    pub password_hash: Secret<String>,
    pub is_verified: bool,
    pub verification_code: Option<String>,
    pub verification_expires: Option<DateTime<Utc>>,
    pub reset_code: Option<String>,
    pub reset_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The user as returned to callers - password hash and code fields
    /// stripped.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.expose().to_owned(),
            is_verified: self.is_verified,
            created_at: self.created_at,
        }
    }
}

/// Fields for creating a user. Users are always created unverified with a
/// pending verification code.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: Secret<String>,
    pub verification_code: String,
    pub verification_expires: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}
