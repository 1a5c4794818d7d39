pub mod auth;
pub mod codes;
pub mod submissions;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use storereg_core::Error;

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

pub(crate) fn error_body(message: &str) -> Json<Value> {
    Json(json!({ "error": message }))
}

/// Default error-to-status mapping for the JSON surface. Endpoints with a
/// contract of their own (redeem, gated create) match inline instead.
pub(crate) fn map_error(err: Error) -> (StatusCode, Json<Value>) {
    let status = match &err {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::CapacityExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        Error::Upstream(_) => StatusCode::BAD_GATEWAY,
    };

    if status.is_server_error() {
        tracing::error!("request failed: {err}");
    }

    (status, error_body(&err.to_string()))
}

/// Lookup variant of [`map_error`]: a missing record gets the endpoint's own
/// 404 message, every other failure keeps its taxonomy mapping. Never turns a
/// store failure into a 404.
pub(crate) fn map_lookup_error(err: Error, not_found_message: &str) -> (StatusCode, Json<Value>) {
    match err {
        Error::NotFound(_) => (StatusCode::NOT_FOUND, error_body(not_found_message)),
        other => map_error(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        let cases = [
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::Conflict("x".into()), StatusCode::CONFLICT),
            (Error::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (
                Error::CapacityExhausted {
                    attempts: 32,
                    length: 2,
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                Error::Database("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Error::Upstream("x".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, expected) in cases {
            assert_eq!(map_error(err).0, expected);
        }
    }

    #[test]
    fn lookup_mapping_customizes_only_the_missing_case() {
        let (status, body) = map_lookup_error(Error::NotFound("x".into()), "Unique code not found");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.0["error"], "Unique code not found");

        let (status, _) = map_lookup_error(Error::Database("pool down".into()), "unused");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = map_lookup_error(Error::InvalidInput("blank".into()), "unused");
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
