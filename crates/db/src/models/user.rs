//! User entity model and DTOs.

use cctv_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and live session token -- NEVER serialize this
/// to API responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub role: String,
    pub account_tier: String,
    pub session_token: Option<String>,
    pub device_id: Option<String>,
    pub fixed_cctv_ids: Option<Json<Vec<DbId>>>,
    pub reset_requested: bool,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub upgraded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The persisted fixed CCTV assignment, if any.
    pub fn fixed_assignment(&self) -> Option<&[DbId]> {
        self.fixed_cctv_ids.as_ref().map(|ids| ids.0.as_slice())
    }
}

/// Safe user representation for API responses (no secrets).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub role: String,
    #[serde(rename = "accountStatus")]
    pub account_tier: String,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            photo_url: user.photo_url.clone(),
            role: user.role.clone(),
            account_tier: user.account_tier.clone(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. Role and tier take their column defaults.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub photo_url: Option<String>,
}

/// The two columns the visibility engine needs for a listing decision.
#[derive(Debug, Clone, FromRow)]
pub struct VisibilityProfile {
    pub account_tier: String,
    pub fixed_cctv_ids: Option<Json<Vec<DbId>>>,
}

impl VisibilityProfile {
    pub fn fixed_assignment(&self) -> Option<&[DbId]> {
        self.fixed_cctv_ids.as_ref().map(|ids| ids.0.as_slice())
    }
}
