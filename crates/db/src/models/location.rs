//! Location entity model and DTOs.

use cctv_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new location.
#[derive(Debug)]
pub struct CreateLocation {
    pub name: String,
}

/// DTO for updating a location. All fields are optional.
#[derive(Debug, Default)]
pub struct UpdateLocation {
    pub name: Option<String>,
}
