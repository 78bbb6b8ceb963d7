//! Tiered CCTV visibility.
//!
//! Free accounts see a fixed random sample of active CCTVs, chosen on first
//! access and persisted on the user row; paid accounts see every active CCTV.
//! The decision rules live in [`cctv_core::tier`]; this module loads and
//! persists the state they need.

use cctv_core::error::CoreError;
use cctv_core::tier::{
    needs_assignment, scope_for, AccountTier, VisibilityScope, FIXED_SAMPLE_SIZE,
    PUBLIC_PREVIEW_LIMIT,
};
use cctv_core::types::DbId;
use cctv_db::models::cctv::{CctvFilter, CctvWithLocation};
use cctv_db::models::user::VisibilityProfile;
use cctv_db::repositories::{CctvRepo, UserRepo};
use cctv_db::DbPool;

use crate::error::{AppError, AppResult};

/// Outcome of a tier-aware listing.
#[derive(Debug)]
pub struct VisibleCctvs {
    pub tier: AccountTier,
    pub cctvs: Vec<CctvWithLocation>,
}

/// List the active CCTVs `user_id` may see, optionally narrowed to one location.
///
/// Ordered by location name, then CCTV name.
pub async fn list_visible_cctvs(
    pool: &DbPool,
    user_id: DbId,
    location_id: Option<DbId>,
) -> AppResult<VisibleCctvs> {
    let (tier, scope) = resolve_scope(pool, user_id).await?;
    let filter = CctvFilter {
        ids: scope.id_filter(),
        location_id,
        limit: None,
    };
    let cctvs = CctvRepo::list_active(pool, &filter).await?;
    Ok(VisibleCctvs { tier, cctvs })
}

/// Fetch one CCTV if `user_id`'s tier allows it.
pub async fn find_visible_cctv(
    pool: &DbPool,
    user_id: DbId,
    cctv_id: DbId,
) -> AppResult<CctvWithLocation> {
    let (_, scope) = resolve_scope(pool, user_id).await?;
    let cctv = CctvRepo::find_by_id(pool, cctv_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CCTV",
            id: cctv_id,
        }))?;
    if !scope.permits(cctv.id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "This CCTV is not included in your free plan. Upgrade to view all CCTVs".into(),
        )));
    }
    Ok(cctv)
}

/// Anonymous preview: the first active CCTVs in listing order, no assignment.
pub async fn list_public_preview(
    pool: &DbPool,
    location_id: Option<DbId>,
) -> AppResult<Vec<CctvWithLocation>> {
    let filter = CctvFilter {
        ids: None,
        location_id,
        limit: Some(PUBLIC_PREVIEW_LIMIT),
    };
    Ok(CctvRepo::list_active(pool, &filter).await?)
}

/// Determine the caller's tier and visibility scope, sampling and persisting
/// a fixed assignment for a free account that has none.
///
/// Persisting is a conditional write. If another request stored an
/// assignment first (or the account was upgraded meanwhile), the stored
/// state is reloaded so every caller converges on the same subset.
pub async fn resolve_scope(
    pool: &DbPool,
    user_id: DbId,
) -> AppResult<(AccountTier, VisibilityScope)> {
    let profile = load_profile(pool, user_id).await?;
    let tier = parse_tier(&profile)?;
    if !needs_assignment(tier, profile.fixed_assignment()) {
        return Ok((tier, scope_for(tier, profile.fixed_assignment())));
    }

    let sampled = CctvRepo::sample_active_ids(pool, FIXED_SAMPLE_SIZE).await?;
    if sampled.is_empty() {
        // Nothing to persist; the next request samples again.
        return Ok((tier, VisibilityScope::Restricted(Vec::new())));
    }

    if UserRepo::assign_fixed_cctvs(pool, user_id, &sampled).await? {
        tracing::info!(user_id, count = sampled.len(), "Assigned fixed CCTV sample");
        return Ok((tier, VisibilityScope::Restricted(sampled)));
    }

    tracing::debug!(user_id, "Fixed CCTV sample already stored, reloading");
    let profile = load_profile(pool, user_id).await?;
    let tier = parse_tier(&profile)?;
    Ok((tier, scope_for(tier, profile.fixed_assignment())))
}

async fn load_profile(pool: &DbPool, user_id: DbId) -> AppResult<VisibilityProfile> {
    UserRepo::find_visibility(pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))
}

fn parse_tier(profile: &VisibilityProfile) -> AppResult<AccountTier> {
    profile
        .account_tier
        .parse()
        .map_err(|e: cctv_core::tier::UnknownTier| AppError::InternalError(e.to_string()))
}
