use serde::{Deserialize, Serialize};

/// Claims asserted by an access token. No roles or scopes - identity only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub user_id: i64,
    pub email: String,
}
