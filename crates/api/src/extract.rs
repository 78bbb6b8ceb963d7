//! Request extractors that reject with the API's error envelope instead of
//! axum's plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use cctv_core::types::DbId;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is decoded and then validated with `validator`.
///
/// Undecodable bodies become `400 Invalid request body`; field failures
/// become the `errors` envelope.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            AppError::BadRequest("Invalid request body".into())
        })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// A numeric `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub DbId);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Invalid ID format".into()))?;
        raw.parse::<DbId>()
            .map(ResourceId)
            .map_err(|_| AppError::BadRequest("Invalid ID format".into()))
    }
}

/// Query string decoded into `T`, rejecting with the error envelope.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::BadRequest("Invalid query parameters".into()))?;
        Ok(QueryParams(value))
    }
}
