//! Handlers for the caller's own account.

use axum::extract::State;
use axum::Json;
use cctv_core::error::CoreError;
use cctv_core::types::DbId;
use cctv_db::models::user::UserResponse;
use cctv_db::repositories::UserRepo;
use cctv_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/account
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(user_not_found(auth.user_id))?;
    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// POST /api/account/upgrade
///
/// Move the caller to the paid tier. The fixed free-tier sample is dropped.
pub async fn upgrade(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = upgrade_account(&state.pool, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// Upgrade `user_id` to paid and return the refreshed profile.
pub(crate) async fn upgrade_account(pool: &DbPool, user_id: DbId) -> AppResult<UserResponse> {
    if !UserRepo::upgrade_to_paid(pool, user_id).await? {
        return Err(user_not_found(user_id));
    }
    tracing::info!(user_id, "Account upgraded to paid");

    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(user_not_found(user_id))?;
    Ok(UserResponse::from(&user))
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}
