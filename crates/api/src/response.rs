//! Shared response envelope types for API handlers.
//!
//! Every successful response is `{"success": true, "data": ...}`; errors are
//! rendered by [`crate::error::AppError`].

use serde::Serialize;

/// Standard `{ "success": true, "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Payload for operations that only report an outcome.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
