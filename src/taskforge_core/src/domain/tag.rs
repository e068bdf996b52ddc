use chrono::{DateTime, Utc};
use serde::Serialize;

/// A tag name, unique per user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A tag together with how many of the owner's todos use it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagWithCount {
    pub id: i64,
    pub name: String,
    pub count: usize,
}
