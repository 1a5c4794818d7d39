use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Back-office administrator account. Passwords are bcrypt hashes; the hash
/// never leaves the server in a response body.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
