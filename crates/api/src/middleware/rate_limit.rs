//! Global throttle for the device-reset endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Consumes one token from the shared reset bucket, or rejects with 429.
///
/// The bucket is process-wide, not per caller: request and confirm share it.
/// Place it before body extractors so throttled requests are turned away
/// without touching the database.
#[derive(Debug)]
pub struct ResetThrottle;

impl FromRequestParts<AppState> for ResetThrottle {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let allowed = state.reset_limiter.lock().await.try_acquire();
        if !allowed {
            tracing::warn!("Device reset rate limit exceeded");
            return Err(AppError::RateLimited(
                "Too many reset attempts. Please try again later.".into(),
            ));
        }
        Ok(ResetThrottle)
    }
}
