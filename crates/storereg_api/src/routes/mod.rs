use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{auth, codes, health_check, submissions};
use crate::AppState;

/// 200 MiB cap for result-video uploads.
const VIDEO_BODY_LIMIT: usize = 200 * 1024 * 1024;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Auth
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/auth/check", get(auth::check))
        // Access codes
        .route(
            "/api/unique-code",
            get(codes::list).post(codes::issue).delete(codes::remove),
        )
        .route("/api/unique-code/set-copied", put(codes::set_copied))
        .route("/api/unique-code/validate/:code", get(codes::validate))
        .route("/api/unique-code/redeem", post(codes::redeem))
        // Submissions
        .route(
            "/api/submissions",
            get(submissions::list).post(submissions::create),
        )
        .route(
            "/api/submissions/:id",
            get(submissions::get)
                .patch(submissions::update)
                .delete(submissions::remove),
        )
        .route(
            "/api/submissions/:id/video",
            post(submissions::upload_video).layer(DefaultBodyLimit::max(VIDEO_BODY_LIMIT)),
        )
        .with_state(state)
}
