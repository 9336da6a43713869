use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Router fallback: JSON 404 instead of an empty body.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse::new(
        ErrorCode::NotFound,
        "The requested resource was not found",
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}
