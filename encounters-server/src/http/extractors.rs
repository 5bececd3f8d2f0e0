//! Custom Axum extractors

use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body decoded regardless of `Content-Type`.
///
/// Any decode failure is a 400, unlike `axum::Json` which also answers
/// 415 and 422.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: e.body_text(),
            })
        })?;

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: e.to_string(),
            })
        })?;

        Ok(Self(value))
    }
}

/// Extract and parse a typed identifier from the path
pub struct ValidId<I>(pub I);

impl<S, I> FromRequestParts<S> for ValidId<I>
where
    S: Send + Sync,
    I: FromStr<Err = ValidationError> + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Missing { field: "id" }))?;

        Ok(Self(raw.parse()?))
    }
}
