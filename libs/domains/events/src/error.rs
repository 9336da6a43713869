use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Event not found: {0}")]
    NotFound(i32),

    #[error("Invalid password for event {0}")]
    Forbidden(i32),

    /// Store unreachable or a write failed. Safe for the caller to retry.
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DbErr),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::InvalidInput(msg) => AppError::BadRequest(msg),
            EventError::NotFound(_) => AppError::NotFound("Event not found".to_string()),
            EventError::Forbidden(_) => AppError::Forbidden("Invalid password".to_string()),
            EventError::StorageFailure(err) => AppError::Database(err),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
