use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use storereg_core::Error;
use storereg_db::models::unique_code::UniqueCode;
use storereg_db::repository::CodeFilter;

use crate::auth::AdminSession;
use crate::handlers::{error_body, map_error, map_lookup_error};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    status: Option<String>,
    code: Option<String>,
}

/// GET /api/unique-code: dashboard table. `?code=` fetches one record,
/// `?status=unused|used` filters the listing.
pub async fn list(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(code) = query.code.as_deref() {
        let record = state
            .service
            .validate_code(code)
            .await
            .map_err(|e| map_lookup_error(e, "Unique code not found"))?;
        return Ok(Json(json!({ "code": record })));
    }

    let filter = match query.status.as_deref() {
        Some("unused") => Some(CodeFilter::Unused),
        Some("used") => Some(CodeFilter::Used),
        _ => None,
    };

    let codes = state.service.list_codes(filter).await.map_err(map_error)?;
    Ok(Json(json!({ "codes": codes })))
}

#[derive(Debug, Deserialize)]
pub struct IssueBody {
    code: Option<String>,
    count: Option<u32>,
    length: Option<usize>,
}

/// POST /api/unique-code: batch generation when `count` is given,
/// otherwise a single explicit code.
pub async fn issue(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(body): Json<IssueBody>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if let Some(count) = body.count.filter(|c| *c > 0) {
        let length = body
            .length
            .unwrap_or(storereg_core::codegen::DEFAULT_CODE_LENGTH);
        let codes = state
            .service
            .issue_multiple(count, length)
            .await
            .map_err(map_error)?;
        return Ok((StatusCode::CREATED, Json(json!({ "codes": codes }))));
    }

    let Some(code) = body.code.filter(|c| !c.trim().is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            error_body("Code is required for single code creation"),
        ));
    };

    let record = state
        .service
        .issue_explicit(&code)
        .await
        .map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(json!({ "code": record }))))
}

#[derive(Debug, Deserialize)]
pub struct DeleteBody {
    #[serde(default)]
    code: String,
}

/// DELETE /api/unique-code: confirmation either way, matching the
/// dashboard's fire-and-forget delete button.
pub async fn remove(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(body): Json<DeleteBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .delete_code(&body.code)
        .await
        .map_err(map_error)?;
    Ok(Json(json!({ "message": "Unique code deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct SetCopiedBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    is_copied: bool,
}

/// PUT /api/unique-code/set-copied: clipboard annotation toggle.
pub async fn set_copied(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(body): Json<SetCopiedBody>,
) -> Result<Json<UniqueCode>, (StatusCode, Json<Value>)> {
    let record = state
        .service
        .mark_code_copied(&body.code, body.is_copied)
        .await
        .map_err(map_error)?;
    Ok(Json(record))
}

/// GET /api/unique-code/validate/:code: public form gate. Returns the full
/// record including state; the form must still treat a used code as dead.
pub async fn validate(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<UniqueCode>, (StatusCode, Json<Value>)> {
    state
        .service
        .validate_code(&code)
        .await
        .map(Json)
        .map_err(|e| map_lookup_error(e, "Invalid access code"))
}

#[derive(Debug, Deserialize)]
pub struct RedeemBody {
    #[serde(default)]
    code: String,
    submission_id: i64,
}

/// POST /api/unique-code/redeem: the authoritative consume. Already-used
/// and nonexistent codes both answer 400 here; the form shows the same
/// rejection message for either.
pub async fn redeem(
    State(state): State<AppState>,
    Json(body): Json<RedeemBody>,
) -> Result<Json<UniqueCode>, (StatusCode, Json<Value>)> {
    match state.service.redeem_code(&body.code, body.submission_id).await {
        Ok(record) => Ok(Json(record)),
        Err(Error::Conflict(_)) | Err(Error::NotFound(_)) => Err((
            StatusCode::BAD_REQUEST,
            error_body("Invalid or already used code"),
        )),
        Err(e) => Err(map_error(e)),
    }
}
