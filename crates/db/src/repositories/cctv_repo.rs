//! Repository for the `cctvs` table.
//!
//! Reads always join `locations` so callers get [`CctvWithLocation`] rows.
//! Writes use a CTE so the inserted/updated row comes back in the same shape.

use cctv_core::types::DbId;
use sqlx::PgPool;

use crate::models::cctv::{CctvFilter, CctvWithLocation, CreateCctv, UpdateCctv};

/// Select list for the `c JOIN l` shape returned by every read.
const JOINED_COLUMNS: &str = "c.id, c.location_id, l.name AS location_name, c.name, \
                              c.thumbnail_url, c.source_url, c.is_active, \
                              c.created_at, c.updated_at";

/// Listing order: location name, then CCTV name, both in byte order.
const LIST_ORDER: &str = "ORDER BY l.name COLLATE \"C\" ASC, c.name COLLATE \"C\" ASC, c.id ASC";

/// Provides CRUD and listing operations for CCTVs.
pub struct CctvRepo;

impl CctvRepo {
    /// Insert a new CCTV, returning the created row with its location name.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCctv,
    ) -> Result<CctvWithLocation, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO cctvs (location_id, name, thumbnail_url, source_url)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {JOINED_COLUMNS} FROM c JOIN locations l ON l.id = c.location_id"
        );
        sqlx::query_as::<_, CctvWithLocation>(&query)
            .bind(input.location_id)
            .bind(&input.name)
            .bind(&input.thumbnail_url)
            .bind(&input.source_url)
            .fetch_one(pool)
            .await
    }

    /// Find a CCTV by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CctvWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM cctvs c JOIN locations l ON l.id = c.location_id
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, CctvWithLocation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a CCTV by exact name.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<CctvWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM cctvs c JOIN locations l ON l.id = c.location_id
             WHERE c.name = $1"
        );
        sqlx::query_as::<_, CctvWithLocation>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Find a CCTV by exact source URL.
    pub async fn find_by_source_url(
        pool: &PgPool,
        source_url: &str,
    ) -> Result<Option<CctvWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM cctvs c JOIN locations l ON l.id = c.location_id
             WHERE c.source_url = $1"
        );
        sqlx::query_as::<_, CctvWithLocation>(&query)
            .bind(source_url)
            .fetch_optional(pool)
            .await
    }

    /// List active CCTVs matching `filter`, ordered by location then name.
    ///
    /// An id restriction of `Some(&[])` matches nothing.
    pub async fn list_active(
        pool: &PgPool,
        filter: &CctvFilter<'_>,
    ) -> Result<Vec<CctvWithLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM cctvs c JOIN locations l ON l.id = c.location_id
             WHERE c.is_active = true
               AND ($1::BIGINT[] IS NULL OR c.id = ANY($1))
               AND ($2::BIGINT IS NULL OR c.location_id = $2)
             {LIST_ORDER}
             LIMIT $3"
        );
        sqlx::query_as::<_, CctvWithLocation>(&query)
            .bind(filter.ids)
            .bind(filter.location_id)
            .bind(filter.limit)
            .fetch_all(pool)
            .await
    }

    /// Draw up to `limit` active CCTV ids uniformly at random.
    pub async fn sample_active_ids(pool: &PgPool, limit: i64) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM cctvs WHERE is_active = true ORDER BY random() LIMIT $1")
                .bind(limit)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Update a CCTV. Only fields present in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCctv,
    ) -> Result<Option<CctvWithLocation>, sqlx::Error> {
        // For thumbnail_url: if the outer Option is Some, use the inner value
        // (which may be None to clear). If the outer Option is None, keep existing.
        let thumbnail_provided = input.thumbnail_url.is_some();
        let thumbnail_value = input.thumbnail_url.as_ref().and_then(|v| v.as_deref());

        let query = format!(
            "WITH c AS (
                UPDATE cctvs SET
                    location_id   = COALESCE($2, location_id),
                    name          = COALESCE($3, name),
                    thumbnail_url = CASE WHEN $4 THEN $5 ELSE thumbnail_url END,
                    source_url    = COALESCE($6, source_url),
                    is_active     = COALESCE($7, is_active),
                    updated_at    = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT {JOINED_COLUMNS} FROM c JOIN locations l ON l.id = c.location_id"
        );
        sqlx::query_as::<_, CctvWithLocation>(&query)
            .bind(id)
            .bind(input.location_id)
            .bind(&input.name)
            .bind(thumbnail_provided)
            .bind(thumbnail_value)
            .bind(&input.source_url)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a CCTV. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cctvs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
