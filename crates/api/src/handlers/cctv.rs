//! Handlers for the `/cctvs` resource and its public preview.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cctv_core::error::CoreError;
use cctv_core::patch::nullable;
use cctv_core::types::DbId;
use cctv_db::models::cctv::{CctvView, CreateCctv, UpdateCctv};
use cctv_db::repositories::CctvRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{map_cctv_write_error, AppError, AppResult};
use crate::extract::{QueryParams, ResourceId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;
use crate::visibility;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for CCTV listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CctvListQuery {
    pub location_id: Option<DbId>,
}

/// Request body for `POST /cctvs`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCctvRequest {
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub location_id: DbId,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(url(message = "must be a valid URL"))]
    pub thumbnail_url: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub source_url: String,
}

/// Request body for `PUT /cctvs/{id}`. Absent fields are left unchanged;
/// `"thumbnailUrl": null` clears the thumbnail.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCctvRequest {
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub location_id: Option<DbId>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(url(message = "must be a valid URL"))]
    pub thumbnail_url: Option<Option<String>>,
    #[validate(url(message = "must be a valid URL"))]
    pub source_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Tier-aware listing payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CctvListing {
    pub account_status: String,
    pub count: usize,
    pub cctvs: Vec<CctvView>,
}

/// Anonymous preview payload.
#[derive(Debug, Serialize)]
pub struct PublicCctvListing {
    pub count: usize,
    pub cctvs: Vec<CctvView>,
}

// ---------------------------------------------------------------------------
// Public preview
// ---------------------------------------------------------------------------

/// GET /api/public/cctvs
pub async fn list_public(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CctvListQuery>,
) -> AppResult<Json<ApiResponse<PublicCctvListing>>> {
    let rows = visibility::list_public_preview(&state.pool, query.location_id).await?;
    let cctvs: Vec<CctvView> = rows.into_iter().map(CctvView::from).collect();
    Ok(Json(ApiResponse::ok(PublicCctvListing {
        count: cctvs.len(),
        cctvs,
    })))
}

/// GET /api/public/cctvs/{id}
pub async fn get_public(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<ApiResponse<CctvView>>> {
    let cctv = CctvRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(ApiResponse::ok(CctvView::from(cctv))))
}

// ---------------------------------------------------------------------------
// Authenticated
// ---------------------------------------------------------------------------

/// GET /api/cctvs
///
/// Free accounts see their fixed sample; paid accounts see every active CCTV.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<CctvListQuery>,
) -> AppResult<Json<ApiResponse<CctvListing>>> {
    let visible =
        visibility::list_visible_cctvs(&state.pool, auth.user_id, query.location_id).await?;
    let cctvs: Vec<CctvView> = visible.cctvs.into_iter().map(CctvView::from).collect();
    Ok(Json(ApiResponse::ok(CctvListing {
        account_status: visible.tier.to_string(),
        count: cctvs.len(),
        cctvs,
    })))
}

/// GET /api/cctvs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
) -> AppResult<Json<ApiResponse<CctvView>>> {
    let cctv = visibility::find_visible_cctv(&state.pool, auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(CctvView::from(cctv))))
}

/// POST /api/cctvs
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateCctvRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CctvView>>)> {
    ensure_unique(&state, Some(&input.name), Some(&input.source_url), None).await?;

    let cctv = CctvRepo::create(
        &state.pool,
        &CreateCctv {
            location_id: input.location_id,
            name: input.name,
            thumbnail_url: input.thumbnail_url,
            source_url: input.source_url,
        },
    )
    .await
    .map_err(map_cctv_write_error)?;

    tracing::info!(user_id = auth.user_id, cctv_id = cctv.id, "CCTV created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(CctvView::from(cctv)))))
}

/// PUT /api/cctvs/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
    ValidatedJson(input): ValidatedJson<UpdateCctvRequest>,
) -> AppResult<Json<ApiResponse<CctvView>>> {
    ensure_unique(
        &state,
        input.name.as_deref(),
        input.source_url.as_deref(),
        Some(id),
    )
    .await?;

    let patch = UpdateCctv {
        location_id: input.location_id,
        name: input.name,
        thumbnail_url: input.thumbnail_url,
        source_url: input.source_url,
        is_active: input.is_active,
    };
    let cctv = CctvRepo::update(&state.pool, id, &patch)
        .await
        .map_err(map_cctv_write_error)?
        .ok_or(not_found(id))?;

    tracing::info!(user_id = auth.user_id, cctv_id = id, "CCTV updated");
    Ok(Json(ApiResponse::ok(CctvView::from(cctv))))
}

/// DELETE /api/cctvs/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ResourceId(id): ResourceId,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    if !CctvRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = auth.user_id, cctv_id = id, "CCTV deleted");
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "CCTV deleted successfully",
    ))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pre-write uniqueness checks on name and source URL that name the
/// colliding CCTV. `except` skips the row being updated.
async fn ensure_unique(
    state: &AppState,
    name: Option<&str>,
    source_url: Option<&str>,
    except: Option<DbId>,
) -> AppResult<()> {
    if let Some(name) = name {
        if let Some(existing) = CctvRepo::find_by_name(&state.pool, name).await? {
            if Some(existing.id) != except {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "CCTV with name '{}' already exists (ID: {})",
                    existing.name, existing.id
                ))));
            }
        }
    }
    if let Some(url) = source_url {
        if let Some(existing) = CctvRepo::find_by_source_url(&state.pool, url).await? {
            if Some(existing.id) != except {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "CCTV with this source URL already exists: '{}' (ID: {})",
                    existing.name, existing.id
                ))));
            }
        }
    }
    Ok(())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "CCTV", id })
}
