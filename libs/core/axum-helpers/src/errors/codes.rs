//! Stable error identifiers for API responses.
//!
//! Every error body carries the SCREAMING_SNAKE identifier (`error`) and an integer
//! code (`code`) used in logs and dashboards.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidId;
//! assert_eq!(code.as_str(), "INVALID_ID");
//! assert_eq!(code.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request body failed field validation
    ValidationError,

    /// Path identifier is not a positive integer
    InvalidId,

    /// Body could not be read as JSON (wrong content type, too large)
    JsonExtraction,

    NotFound,

    InternalError,

    /// Caller does not hold the resource secret
    Forbidden,

    /// Body is not valid JSON or is missing required fields
    InvalidJson,

    ServiceUnavailable,

    /// Request rejected for a reason not covered above
    BadRequest,

    // Database errors (2000-2999)
    DatabaseNotFound,

    DatabaseError,

    /// Connection refused, pool exhausted or acquire timed out
    DatabaseUnavailable,

    DatabaseUnhandled,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidJson => "INVALID_JSON",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::BadRequest => "BAD_REQUEST",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::DatabaseUnhandled => "DATABASE_UNHANDLED",
        }
    }

    /// Integer code for logs and metrics.
    ///
    /// - 1000-1999: client and generic server errors
    /// - 2000-2999: database errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Forbidden => 1007,
            Self::InvalidJson => 1010,
            Self::ServiceUnavailable => 1011,
            Self::BadRequest => 1012,

            Self::DatabaseNotFound => 2001,
            Self::DatabaseError => 2003,
            Self::DatabaseUnavailable => 2013,
            Self::DatabaseUnhandled => 2099,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid ID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::Forbidden => "Access forbidden",
            Self::InvalidJson => "Invalid JSON format",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::BadRequest => "Bad request",
            Self::DatabaseNotFound => "Database record not found",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseUnavailable => "Database is temporarily unavailable",
            Self::DatabaseUnhandled => "Unhandled database error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
