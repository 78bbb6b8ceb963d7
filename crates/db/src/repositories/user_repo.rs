//! Repository for the `users` table.
//!
//! Besides plain CRUD this owns the three pieces of per-user state the API
//! coordinates through the database: the live session token, the free-tier
//! fixed CCTV assignment, and the in-flight device-reset token.

use cctv_core::tier::TIER_PAID;
use cctv_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, VisibilityProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, name, photo_url, role, \
                       account_tier, session_token, device_id, fixed_cctv_ids, \
                       reset_requested, reset_token_hash, reset_token_expires_at, \
                       last_login_at, upgraded_at, created_at, updated_at";

/// Provides CRUD and session-state operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, name, photo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(&input.photo_url)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user whose username OR email equals `identifier` (case-sensitive).
    pub async fn find_by_login(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// The currently stored session token.
    ///
    /// Returns `None` both when the user does not exist and when nobody is
    /// logged in; the session guard treats the two identically.
    pub async fn find_session_token(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT session_token FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.and_then(|(token,)| token))
    }

    /// Store a freshly issued session token, replacing any previous one, and
    /// stamp `last_login_at`.
    ///
    /// `device_id` is bound only if the account has no device yet; an existing
    /// binding is never overwritten here.
    pub async fn start_session(
        pool: &PgPool,
        id: DbId,
        token: &str,
        device_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                session_token = $2,
                device_id = COALESCE(device_id, $3),
                last_login_at = NOW(),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .bind(device_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the stored session token. Returns `true` if the row was updated.
    pub async fn clear_session(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET session_token = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Tier and fixed assignment
    // -----------------------------------------------------------------------

    /// Load the tier and fixed assignment for a visibility decision.
    pub async fn find_visibility(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VisibilityProfile>, sqlx::Error> {
        sqlx::query_as::<_, VisibilityProfile>(
            "SELECT account_tier, fixed_cctv_ids FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Persist a fixed CCTV assignment for a free account that has none yet.
    ///
    /// The write is conditional: it only lands while the stored assignment is
    /// NULL or empty and the account is still free. Returns `false` when
    /// another request already stored one (or the account was upgraded), in
    /// which case the caller should reload the stored value.
    pub async fn assign_fixed_cctvs(
        pool: &PgPool,
        id: DbId,
        cctv_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET fixed_cctv_ids = $2, updated_at = NOW()
             WHERE id = $1
               AND account_tier = 'free'
               AND (fixed_cctv_ids IS NULL OR fixed_cctv_ids = '[]'::jsonb)",
        )
        .bind(id)
        .bind(Json(cctv_ids))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move an account to the paid tier and drop its fixed assignment.
    ///
    /// Returns `true` if the row was updated.
    pub async fn upgrade_to_paid(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                account_tier = $2,
                fixed_cctv_ids = NULL,
                upgraded_at = NOW(),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(TIER_PAID)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Device reset
    // -----------------------------------------------------------------------

    /// Record an in-flight device reset, replacing any previous one.
    pub async fn reserve_reset_token(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                reset_requested = true,
                reset_token_hash = $2,
                reset_token_expires_at = $3,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Withdraw a reserved reset token (compensation for a failed send).
    ///
    /// Only clears the fields if they still hold `token_hash`, so a newer
    /// reservation is left untouched.
    pub async fn release_reset_token(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                reset_requested = false,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = NOW()
             WHERE id = $1 AND reset_token_hash = $2",
        )
        .bind(id)
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find the user holding an unconsumed reset token with this hash.
    pub async fn find_by_reset_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE reset_token_hash = $1 AND reset_requested = true"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Consume a reset token: clear the device binding and all reset fields in
    /// one statement.
    ///
    /// Returns `false` if the token was already consumed or replaced.
    pub async fn complete_device_reset(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                device_id = NULL,
                reset_requested = false,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = NOW()
             WHERE id = $1 AND reset_token_hash = $2 AND reset_requested = true",
        )
        .bind(id)
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
