use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use storereg_core::Error;
use storereg_db::models::submission::{NewSubmission, SubmissionStatus};

use crate::auth::AdminSession;
use crate::handlers::{error_body, map_error};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    #[serde(flatten)]
    input: NewSubmission,
    /// Present when the form was reached through an access code; creation
    /// and redemption then commit or roll back together.
    code: Option<String>,
}

/// POST /api/submissions: the public form endpoint.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let submission = state
        .service
        .create_submission(&body.input, body.code.as_deref())
        .await
        .map_err(|e| match e {
            // An unusable code blocks the applicant with a 400 regardless
            // of whether it is spent or simply wrong.
            Error::Conflict(_) | Error::NotFound(_) => (
                StatusCode::BAD_REQUEST,
                error_body("Invalid or already used code"),
            ),
            other => map_error(other),
        })?;

    Ok((StatusCode::CREATED, Json(json!({ "submission": submission }))))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    status: Option<String>,
}

/// GET /api/submissions: review dashboard listing.
pub async fn list(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(SubmissionStatus::parse(raw).map_err(map_error)?),
        None => None,
    };

    let submissions = state
        .service
        .list_submissions(status)
        .await
        .map_err(map_error)?;
    Ok(Json(json!({ "submissions": submissions })))
}

/// GET /api/submissions/:id
pub async fn get(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let submission = state.service.get_submission(id).await.map_err(map_error)?;
    Ok(Json(json!({ "submission": submission })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    status: Option<String>,
    video_url: Option<String>,
}

/// PATCH /api/submissions/:id: status and/or artifact. The status string
/// is parsed before anything is written, so an invalid value leaves the
/// record untouched even when a video_url rides along.
pub async fn update(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.status.is_none() && body.video_url.is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            error_body("Either status or video_url must be provided"),
        ));
    }

    let status = match body.status.as_deref() {
        Some(raw) => Some(SubmissionStatus::parse(raw).map_err(map_error)?),
        None => None,
    };

    let submission = match (status, body.video_url.as_deref()) {
        (Some(SubmissionStatus::Finished), Some(url)) => {
            // The composed case: artifact attach + finish in one update.
            state.service.finish_with_video(id, url).await
        }
        (Some(status), Some(url)) => {
            state
                .service
                .set_submission_status_and_video(id, status, url)
                .await
        }
        (Some(status), None) => state.service.set_submission_status(id, status).await,
        (None, Some(url)) => state.service.set_submission_video_url(id, url).await,
        (None, None) => unreachable!("guarded above"),
    }
    .map_err(map_error)?;

    Ok(Json(json!({ "submission": submission })))
}

/// DELETE /api/submissions/:id: hard delete, no tombstone.
pub async fn remove(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .delete_submission(id)
        .await
        .map_err(map_error)?;
    Ok(Json(json!({ "message": "Submission deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    filename: Option<String>,
}

/// POST /api/submissions/:id/video: raw body upload. On success the
/// submission is finished with the durable URL and the applicant notified.
pub async fn upload_video(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let filename = query.filename.unwrap_or_default();
    let submission = state
        .service
        .upload_video(id, &filename, body.to_vec())
        .await
        .map_err(map_error)?;
    Ok(Json(json!({ "submission": submission })))
}
