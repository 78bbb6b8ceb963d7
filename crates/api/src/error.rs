use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cctv_core::error::CoreError;
use cctv_db::constraint::{ConstraintKind, ConstraintViolation};
use serde::Serialize;
use serde_json::json;
use validator::{ValidationError, ValidationErrors};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{"success": false, ...}`
/// envelopes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cctv_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Field-level validation failures on a decoded request body.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource that is not addressed by id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was throttled.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// One entry of the `errors` array in a validation failure response.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, core.to_string()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Validation(errors) => {
                let body = json!({
                    "success": false,
                    "errors": field_errors(errors),
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status and client-safe message.
///
/// - `RowNotFound` maps to 404.
/// - Unique and foreign-key violations map to 409 with a message naming the
///   violated rule.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    if let sqlx::Error::RowNotFound = err {
        return (StatusCode::NOT_FOUND, "Resource not found".to_string());
    }
    if let Some(violation) = ConstraintViolation::from_sqlx(err) {
        tracing::debug!(constraint = %violation.constraint, "Constraint violation");
        return (StatusCode::CONFLICT, violation.describe());
    }
    tracing::error!(error = %err, "Database error");
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
}

/// Map an insert/update error on `cctvs`, turning a dangling `location_id`
/// into a 400 instead of a conflict.
pub fn map_cctv_write_error(err: sqlx::Error) -> AppError {
    match ConstraintViolation::from_sqlx(&err) {
        Some(v) if v.kind == ConstraintKind::ForeignKey => {
            AppError::BadRequest("Invalid location ID".into())
        }
        _ => AppError::Database(err),
    }
}

/// Flatten validator output into a stable, field-sorted list.
///
/// Field names are reported in the camelCase form clients send.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field.to_string());
            errs.iter().map(move |e| FieldError {
                field: field.clone(),
                message: describe(e),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match &*error.code {
        "email" => "must be a valid email address".to_string(),
        "url" => "must be a valid URL".to_string(),
        "required" => "is required".to_string(),
        _ => "is invalid".to_string(),
    }
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
