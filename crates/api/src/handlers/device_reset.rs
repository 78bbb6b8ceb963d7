//! Device-reset flow: request a token by email, then confirm it with the
//! account password to unbind the current device.
//!
//! Requesting is a two-step saga. The token is reserved on the user row,
//! then emailed; if the send fails the reservation is withdrawn so no live
//! token exists that its owner never received.

use axum::extract::State;
use axum::Json;
use cctv_core::error::CoreError;
use cctv_db::repositories::UserRepo;
use chrono::{Duration, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::auth::jwt::{generate_reset_token, hash_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::rate_limit::ResetThrottle;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// How long a reset token stays valid.
const RESET_TOKEN_TTL_HOURS: i64 = 24;

/// Request body for `POST /auth/request-device-reset`.
#[derive(Debug, Deserialize, Validate)]
pub struct RequestResetRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// Request body for `POST /auth/confirm-device-reset`.
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmResetRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub token: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

/// POST /api/auth/request-device-reset
pub async fn request_device_reset(
    _throttle: ResetThrottle,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RequestResetRequest>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::NotFound("No account found for this email".into()))?;

    // 1. Reserve.
    let token = generate_reset_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
    UserRepo::reserve_reset_token(&state.pool, user.id, &token_hash, expires_at).await?;

    // 2. Send; 3. on failure, compensate.
    if let Err(e) = state.mailer.send_device_reset(&user.email, &token).await {
        tracing::error!(user_id = user.id, error = %e, "Device reset email failed, releasing token");
        if let Err(release_err) =
            UserRepo::release_reset_token(&state.pool, user.id, &token_hash).await
        {
            tracing::error!(
                user_id = user.id,
                error = %release_err,
                "Failed to release reset token after email failure"
            );
        }
        return Err(AppError::InternalError(format!(
            "Failed to send device reset email: {e}"
        )));
    }

    tracing::info!(user_id = user.id, "Device reset requested");
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Device reset instructions have been sent to your email",
    ))))
}

/// POST /api/auth/confirm-device-reset
///
/// Re-authenticates with the current password; the password itself is not
/// changed. On success the device binding and reset fields are cleared.
pub async fn confirm_device_reset(
    _throttle: ResetThrottle,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ConfirmResetRequest>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let token_hash = hash_token(&input.token);

    let user = UserRepo::find_by_reset_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(invalid_token)?;

    let now = Utc::now();
    if user.reset_token_expires_at.map_or(true, |at| at <= now) {
        return Err(AppError::BadRequest("Reset token has expired".into()));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized("Invalid password".into())));
    }

    if !UserRepo::complete_device_reset(&state.pool, user.id, &token_hash).await? {
        return Err(invalid_token());
    }

    tracing::info!(user_id = user.id, "Device binding reset");
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Device reset successful. You can now log in from a new device",
    ))))
}

fn invalid_token() -> AppError {
    AppError::NotFound("Invalid or already used reset token".into())
}
