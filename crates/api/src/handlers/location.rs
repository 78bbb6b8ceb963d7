//! Handlers for the `/locations` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cctv_core::error::CoreError;
use cctv_core::types::DbId;
use cctv_db::models::location::{CreateLocation, Location, UpdateLocation};
use cctv_db::repositories::LocationRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ResourceId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /locations` and `PUT /locations/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct LocationRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
}

/// GET /api/public/locations
pub async fn list_public(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Location>>>> {
    let locations = LocationRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(locations)))
}

/// GET /api/locations
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Location>>>> {
    let locations = LocationRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::ok(locations)))
}

/// POST /api/locations
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<LocationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Location>>)> {
    ensure_name_free(&state, &input.name, None).await?;

    let location = LocationRepo::create(&state.pool, &CreateLocation { name: input.name }).await?;

    tracing::info!(user_id = auth.user_id, location_id = location.id, "Location created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(location))))
}

/// PUT /api/locations/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
    ValidatedJson(input): ValidatedJson<LocationRequest>,
) -> AppResult<Json<ApiResponse<Location>>> {
    ensure_name_free(&state, &input.name, Some(id)).await?;

    let patch = UpdateLocation {
        name: Some(input.name),
    };
    let location = LocationRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(not_found(id))?;

    tracing::info!(user_id = auth.user_id, location_id = id, "Location updated");
    Ok(Json(ApiResponse::ok(location)))
}

/// DELETE /api/locations/{id}
///
/// Refused with 409 while any CCTV references the location.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let cctv_count = LocationRepo::count_cctvs(&state.pool, id).await?;
    if cctv_count > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot delete location with associated CCTVs ({cctv_count} found)"
        ))));
    }

    // A CCTV inserted after the count still trips the foreign key (409).
    if !LocationRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user_id = auth.user_id, location_id = id, "Location deleted");
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Location deleted successfully",
    ))))
}

/// Pre-insert uniqueness check that names the colliding row. The unique
/// constraint still backs it up.
async fn ensure_name_free(state: &AppState, name: &str, except: Option<DbId>) -> AppResult<()> {
    if let Some(existing) = LocationRepo::find_by_name(&state.pool, name).await? {
        if Some(existing.id) != except {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Location with name '{}' already exists (ID: {})",
                existing.name, existing.id
            ))));
        }
    }
    Ok(())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Location",
        id,
    })
}
