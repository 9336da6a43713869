//! Integer path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Extracts a single `{id}` segment as a positive `i32`.
///
/// Anything else (`abc`, `0`, `-3`, `1.5`, out of range) is rejected with
/// `400 INVALID_ID` before the handler runs.
///
/// ```ignore
/// async fn get_event(IdPath(id): IdPath) -> String {
///     format!("event {}", id)
/// }
///
/// let app = Router::new().route("/events/{id}", get(get_event));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

impl IdPath {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.parse::<i32>() {
            Ok(id) if id > 0 => Ok(IdPath(id)),
            _ => Err(AppError::InvalidId(format!(
                "Invalid ID '{}': expected a positive integer",
                raw
            ))),
        }
    }
}

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        IdPath::parse(&raw).map_err(|e| e.into_response())
    }
}
