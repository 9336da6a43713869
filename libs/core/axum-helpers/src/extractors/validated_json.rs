//! JSON body extractor that also runs `validator` rules.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserializes the body and validates it.
///
/// Malformed JSON and missing required fields answer `400 INVALID_JSON`;
/// rule violations answer `400 VALIDATION_ERROR` with per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct Register {
///     #[validate(length(min = 1))]
///     nickname: String,
/// }
///
/// async fn register(ValidatedJson(body): ValidatedJson<Register>) -> String {
///     body.nickname
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
