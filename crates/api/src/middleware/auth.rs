//! Session guard: bearer-token authentication with single-session enforcement.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use cctv_core::error::CoreError;
use cctv_core::types::DbId;
use cctv_db::repositories::UserRepo;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Message returned when a valid token is no longer the account's live session.
pub const TOKEN_MISMATCH: &str = "Token mismatch - possibly logged in from another device";

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
///
/// Extraction succeeds only if the token verifies *and* is the token most
/// recently stored for the user at login. Any later login (or a logout)
/// invalidates earlier tokens even before they expire.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub role: String,
    pub claims: Claims,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            AppError::Core(CoreError::Unauthorized(format!("Invalid token: {e}")))
        })?;

        let stored = UserRepo::find_session_token(&state.pool, claims.sub).await?;
        if stored.as_deref() != Some(token) {
            tracing::debug!(user_id = claims.sub, "Rejected superseded session token");
            return Err(AppError::Core(CoreError::Unauthorized(TOKEN_MISMATCH.into())));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role.clone(),
            claims,
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })
}
