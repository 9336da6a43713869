pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1007,
///   "error": "FORBIDDEN",
///   "message": "Invalid password",
///   "details": null
/// }
/// ```
#[derive(Debug, Serialize, serde::Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable identifier, one of [`ErrorCode`]
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Field-level validation failures, when there are any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Errors that render as an [`ErrorResponse`].
///
/// Domain error types convert into this so every crate answers with the same shape.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

type Rendered = (StatusCode, String, Option<serde_json::Value>, ErrorCode);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::Database(e) => map_db_error(&e),
            AppError::JsonExtractorRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidJson.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                match e {
                    JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => (
                        StatusCode::BAD_REQUEST,
                        e.body_text(),
                        None,
                        ErrorCode::InvalidJson,
                    ),
                    other => (
                        other.status(),
                        other.body_text(),
                        None,
                        ErrorCode::JsonExtraction,
                    ),
                }
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(validation_details(&e)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::InvalidId(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidId.code(), "Invalid id: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::InvalidId)
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::BadRequest)
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, msg, None, ErrorCode::Forbidden)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError.default_message().to_string(),
                    None,
                    ErrorCode::InternalError,
                )
            }
        };

        let body = Json(ErrorResponse {
            details,
            ..ErrorResponse::new(code, message)
        });

        (status, body).into_response()
    }
}

/// Flattens validator output into `{ field: [{code, message, params}] }`.
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(fields)
}

/// Store failures render as 503 with a fixed message. The driver text stays in the log.
fn map_db_error(error: &DbErr) -> Rendered {
    match error {
        DbErr::RecordNotFound(what) => {
            tracing::info!(
                error_code = ErrorCode::DatabaseNotFound.code(),
                "Database record not found: {}",
                what
            );
            (
                StatusCode::NOT_FOUND,
                ErrorCode::DatabaseNotFound.default_message().to_string(),
                None,
                ErrorCode::DatabaseNotFound,
            )
        }
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
            tracing::warn!(
                error_code = ErrorCode::DatabaseUnavailable.code(),
                "Database unavailable: {:?}",
                error
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DatabaseUnavailable.default_message().to_string(),
                None,
                ErrorCode::DatabaseUnavailable,
            )
        }
        DbErr::Exec(_) | DbErr::Query(_) => {
            tracing::error!(
                error_code = ErrorCode::DatabaseError.code(),
                "Database error: {:?}",
                error
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DatabaseError.default_message().to_string(),
                None,
                ErrorCode::DatabaseError,
            )
        }
        _ => {
            tracing::error!(
                error_code = ErrorCode::DatabaseUnhandled.code(),
                "Unhandled database error: {:?}",
                error
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::DatabaseUnhandled.default_message().to_string(),
                None,
                ErrorCode::DatabaseUnhandled,
            )
        }
    }
}

/// Build an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}
