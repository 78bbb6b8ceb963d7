//! Handlers for the `/auth` resource (register, login, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cctv_core::error::CoreError;
use cctv_db::models::user::{CreateUser, UserResponse};
use cctv_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::issue_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    #[validate(url(message = "must be a valid URL"))]
    pub photo_url: Option<String>,
}

/// Request body for `POST /auth/login`. `username` also accepts an email.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
    /// Client device identifier; bound to the account on first use.
    pub device_id: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create a free-tier account. Duplicate username or email is a 409.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            name: input.name,
            photo_url: input.photo_url,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::from(&user))),
    ))
}

/// POST /api/auth/login
///
/// Verify credentials, issue a session token and store it as the account's
/// only live session. Any previously issued token stops working.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    // 1. Find user by username or email.
    let user = UserRepo::find_by_login(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    // 2. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    // 3. A bound account only accepts its own device; omitting deviceId
    //    does not bypass the binding.
    if let Some(bound) = &user.device_id {
        if input.device_id.as_deref() != Some(bound.as_str()) {
            tracing::info!(user_id = user.id, "Login refused from unbound device");
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is bound to another device. Request a device reset to continue".into(),
            )));
        }
    }

    // 4. Issue and store the session token.
    let token = issue_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let stored =
        UserRepo::start_session(&state.pool, user.id, &token, input.device_id.as_deref()).await?;
    if !stored {
        return Err(invalid_credentials());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(ApiResponse::ok(LoginResponse {
        token,
        expires_in: state.config.jwt.expiry_hours * 3600,
        user: UserResponse::from(&user),
    })))
}

/// POST /api/auth/logout
///
/// Clear the stored session so the presented token stops working.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    UserRepo::clear_session(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, "User logged out");
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}
