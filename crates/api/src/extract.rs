//! Request extractors that report malformed input in the API's error shape.
//!
//! axum's own `Json` and `Query` reject with plain-text bodies (and 422 for
//! JSON that parses but does not fit the target type). A timestamp that is
//! not RFC 3339, a count that is not an integer or a missing flag is a
//! validation failure here, so these wrappers turn every rejection into
//! [`CoreError::Validation`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use lockerhub_core::error::CoreError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body. Deserialization failures become a 400 `VALIDATION_ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string parameters. Parse failures become a 400 `VALIDATION_ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), error = %rejection, "Rejected JSON body");
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}
