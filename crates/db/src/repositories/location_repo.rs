//! Repository for the `locations` table.

use cctv_core::types::DbId;
use sqlx::PgPool;

use crate::models::location::{CreateLocation, Location, UpdateLocation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let query = format!("INSERT INTO locations (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a location by exact name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE name = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all locations ordered by name (byte order).
    pub async fn list(pool: &PgPool) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations ORDER BY name COLLATE \"C\" ASC");
        sqlx::query_as::<_, Location>(&query).fetch_all(pool).await
    }

    /// Update a location. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                name = COALESCE($2, name),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Number of CCTVs (active or not) that reference this location.
    pub async fn count_cctvs(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cctvs WHERE location_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Hard-delete a location. Returns `true` if a row was deleted.
    ///
    /// Fails with a foreign-key violation if CCTVs still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
