use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Request-level failures surfaced as JSON error objects. Handlers
/// return these without having mutated any state.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    RouteNotFound,
    NoActiveMission,
    AlreadyMoving,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, "Route not found".to_string()),
            ApiError::NoActiveMission => {
                (StatusCode::NOT_FOUND, "No active mission".to_string())
            }
            ApiError::AlreadyMoving => {
                (StatusCode::CONFLICT, "Mission already moving".to_string())
            }
        };

        (code, Json(json!({ "error": message }))).into_response()
    }
}
