//! JSON body extractor that runs `validator` rules before the handler.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use nousquest_core::error::AppError;

use crate::error::ApiError;

/// Deserialized and validated JSON body.
///
/// Malformed JSON, missing fields, and rule violations all reject with a
/// 400 validation error, so nothing downstream sees an invalid request.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Rejected malformed JSON body");
            AppError::validation("Validation error")
        })?;

        value.validate().map_err(|e| {
            tracing::debug!(error = %e, "Rejected invalid request body");
            AppError::validation("Validation error")
        })?;

        Ok(ValidatedJson(value))
    }
}
