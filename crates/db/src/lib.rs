//! Persistence layer: connection pool, migrations, row models, and repositories.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod constraint;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Pool sizing and startup retry policy.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Upper bound on concurrently open connections.
    pub max_connections: u32,
    /// Connections older than this are closed and replaced, so a restarted
    /// database backend is picked up without restarting the service.
    pub max_lifetime: Duration,
    /// How many times to attempt the initial connection.
    pub connect_attempts: u32,
    /// Fixed pause between initial connection attempts.
    pub retry_delay: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 25,
            max_lifetime: Duration::from_secs(300),
            connect_attempts: 5,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .max_lifetime(settings.max_lifetime)
        .connect(database_url)
        .await
}

/// Create a pool, retrying with a fixed backoff while the database is unreachable.
///
/// Only meant for process startup; request handling never retries.
pub async fn connect_with_retry(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<DbPool, sqlx::Error> {
    let attempts = settings.connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        let result = match create_pool(database_url, settings).await {
            Ok(pool) => health_check(&pool).await.map(|()| pool),
            Err(e) => Err(e),
        };
        match result {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(settings.retry_delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(attempts, error = %e, "Database connection failed, giving up");
                return Err(e);
            }
        }
    }
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations embedded from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
