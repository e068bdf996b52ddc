use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::domain::device::DeviceInfo;

/// Entropy of an opaque refresh token, in bytes, before hex encoding.
const SESSION_TOKEN_BYTES: usize = 40;

/// Generate an opaque refresh-token value: cryptographically random bytes,
/// hex encoded. Never derived from user data.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

/// One persisted refresh token - the record behind a logged-in session.
///
/// `revoked` is monotonic: once set it is never cleared, and a revoked
/// token may carry `replaced_by` pointing at the token that superseded it
/// during rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: i64,
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
    pub replaced_by: Option<String>,
    pub device_name: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub ip_address: Option<String>,
    pub last_used: Option<DateTime<Utc>>,
}

impl Session {
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            device_name: self.device_name.clone(),
            device_type: self.device_type.clone(),
            browser: self.browser.clone(),
            ip_address: self.ip_address.clone(),
        }
    }

    /// Caller-facing summary with defaults filled in for sessions created
    /// without device metadata.
    pub fn to_summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            device_name: self
                .device_name
                .clone()
                .unwrap_or_else(|| "Unknown device".to_owned()),
            device_type: self
                .device_type
                .clone()
                .unwrap_or_else(|| "unknown".to_owned()),
            browser: self.browser.clone().unwrap_or_else(|| "unknown".to_owned()),
            ip_address: self
                .ip_address
                .clone()
                .unwrap_or_else(|| "unknown".to_owned()),
            created_at: self.created_at,
            last_used: self.last_used.unwrap_or(self.created_at),
        }
    }
}

/// Fields for persisting a fresh session. Sessions are always created
/// unrevoked.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub device: Option<DeviceInfo>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSummary {
    pub id: i64,
    pub device_name: String,
    pub device_type: String,
    pub browser: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}
