//! Session-cookie gate for the admin routes.
//!
//! Login stores an opaque random token server-side and hands it to the
//! browser in an HttpOnly cookie; the extractor below looks it up (with
//! expiry) on every admin request. Public routes simply never ask for it.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::Value;

use storereg_db::repository::SessionRepository;

use crate::handlers::error_body;
use crate::AppState;

pub const AUTH_COOKIE: &str = "auth_token";

/// Session lifetime matches the original deployment: one day.
pub const SESSION_TTL_SECONDS: i64 = 60 * 60 * 24;

/// Length of the opaque session token (same alphabet as access codes).
pub const SESSION_TOKEN_LENGTH: usize = 40;

/// Proof that the caller presented a live admin session. Handlers gate
/// themselves by taking this as an argument.
pub struct AdminSession {
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = cookie_value(&parts.headers, AUTH_COOKIE) else {
            return Err(unauthorized());
        };

        let repo = SessionRepository::new(state.service.pool.clone());
        match repo.find_valid(&token).await {
            Ok(Some(_)) => Ok(AdminSession { token }),
            Ok(None) => Err(unauthorized()),
            Err(e) => {
                tracing::error!("session lookup failed: {e}");
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("Authentication check failed"),
                ))
            }
        }
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, error_body("Authentication required"))
}

/// Pulls one cookie out of the `Cookie` header without a cookie jar
/// dependency; the header grammar here is just `k=v; k2=v2`.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;

    for pair in raw.split(';') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key.trim() == name {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "{AUTH_COOKIE}={token}; HttpOnly; Path=/; Max-Age={SESSION_TTL_SECONDS}; SameSite=Strict"
    )
}

pub fn clear_session_cookie() -> String {
    format!("{AUTH_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Strict")
}
