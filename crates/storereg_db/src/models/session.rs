use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Opaque server-side session backing the `auth_token` cookie.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
