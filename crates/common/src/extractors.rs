//! Custom axum extractors for Parley

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::Error;

/// JSON extractor that validates the deserialized value automatically.
///
/// Malformed bodies, missing fields and failed `Validate` rules all reject
/// with `Error::Validation`, so every input problem is a 400 `INVALID_INPUT`
/// carrying the standard error envelope.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Error::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))?;

        Ok(ValidatedJson(value))
    }
}
