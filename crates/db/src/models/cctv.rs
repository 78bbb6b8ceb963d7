//! CCTV entity model, joined view, and DTOs.

use cctv_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A CCTV row joined with the name of its owning location.
///
/// Every read path returns this shape so responses can embed the location.
#[derive(Debug, Clone, FromRow)]
pub struct CctvWithLocation {
    pub id: DbId,
    pub location_id: DbId,
    pub location_name: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub source_url: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Location summary embedded in [`CctvView`].
#[derive(Debug, Clone, Serialize)]
pub struct LocationRef {
    pub id: DbId,
    pub name: String,
}

/// API representation of a CCTV.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CctvView {
    pub id: DbId,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub source_url: String,
    pub is_active: bool,
    pub location: LocationRef,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CctvWithLocation> for CctvView {
    fn from(row: CctvWithLocation) -> Self {
        Self {
            id: row.id,
            name: row.name,
            thumbnail_url: row.thumbnail_url,
            source_url: row.source_url,
            is_active: row.is_active,
            location: LocationRef {
                id: row.location_id,
                name: row.location_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for creating a new CCTV. New CCTVs start active.
#[derive(Debug)]
pub struct CreateCctv {
    pub location_id: DbId,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub source_url: String,
}

/// DTO for partially updating a CCTV.
///
/// `thumbnail_url` is doubly optional so a patch can clear it: `None` leaves
/// the column unchanged, `Some(None)` sets it to NULL.
#[derive(Debug, Default)]
pub struct UpdateCctv {
    pub location_id: Option<DbId>,
    pub name: Option<String>,
    pub thumbnail_url: Option<Option<String>>,
    pub source_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Optional narrowing applied to CCTV listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CctvFilter<'a> {
    /// Restrict to these ids (free-tier assignment). `None` means unrestricted.
    pub ids: Option<&'a [DbId]>,
    pub location_id: Option<DbId>,
    pub limit: Option<i64>,
}
