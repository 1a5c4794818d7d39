use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use storereg_core::codegen;
use storereg_db::repository::{SessionRepository, UserRepository};

use crate::auth::{
    clear_session_cookie, cookie_value, session_cookie, AUTH_COOKIE, SESSION_TOKEN_LENGTH,
    SESSION_TTL_SECONDS,
};
use crate::handlers::error_body;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<(HeaderMap, Json<Value>), (StatusCode, Json<Value>)> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            error_body("Username and password are required"),
        ));
    }

    let users = UserRepository::new(state.service.pool.clone());
    let user = match users.find_by_username(&body.username).await {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("login lookup failed: {e}");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("An error occurred during login"),
            ));
        }
    };

    let invalid = || {
        (
            StatusCode::UNAUTHORIZED,
            error_body("Invalid username or password"),
        )
    };

    let Some(user) = user else {
        return Err(invalid());
    };

    let password_ok = bcrypt::verify(&body.password, &user.password_hash).unwrap_or(false);
    if !password_ok {
        return Err(invalid());
    }

    // Opaque server-side session; the cookie carries no claims.
    let token = codegen::generate(SESSION_TOKEN_LENGTH);
    let expires_at = Utc::now() + Duration::seconds(SESSION_TTL_SECONDS);
    let sessions = SessionRepository::new(state.service.pool.clone());
    if let Err(e) = sessions.insert(&token, expires_at).await {
        tracing::error!("session insert failed: {e}");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("An error occurred during login"),
        ));
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&token)
            .parse()
            .expect("cookie value is valid ASCII"),
    );

    Ok((
        headers,
        Json(json!({
            "message": "Login successful",
            "user": {
                "id": user.id,
                "username": user.username,
                "isAdmin": user.is_admin,
            }
        })),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (HeaderMap, Json<Value>) {
    if let Some(token) = cookie_value(&headers, AUTH_COOKIE) {
        let sessions = SessionRepository::new(state.service.pool.clone());
        if let Err(e) = sessions.delete(&token).await {
            // The cookie is cleared regardless; the stale row expires.
            tracing::warn!("session delete failed: {e}");
        }
    }

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        clear_session_cookie()
            .parse()
            .expect("cookie value is valid ASCII"),
    );

    (response_headers, Json(json!({ "message": "Logout successful" })))
}

pub async fn check(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let authenticated = match cookie_value(&headers, AUTH_COOKIE) {
        Some(token) => {
            let sessions = SessionRepository::new(state.service.pool.clone());
            matches!(sessions.find_valid(&token).await, Ok(Some(_)))
        }
        None => false,
    };

    Json(json!({ "authenticated": authenticated }))
}
