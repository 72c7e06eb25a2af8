//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;
use domain::validation_message;

/// JSON body that has passed its `validator` rules.
///
/// Malformed bodies and rule violations are both rejected as
/// [`AppError::InvalidInput`], i.e. `400 {"error": ...}`.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            AppError::invalid_input(format!("Invalid request body. {}", e.body_text()))
        })?;

        value
            .validate()
            .map_err(|e| AppError::invalid_input(validation_message(&e)))?;

        Ok(ValidatedJson(value))
    }
}
