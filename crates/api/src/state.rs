use std::sync::Arc;

use cctv_core::rate_limit::TokenBucket;
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::mail::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything non-trivial sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cctv_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound email for device resets.
    pub mailer: Arc<dyn Mailer>,
    /// Process-wide throttle shared by both device-reset endpoints.
    pub reset_limiter: Arc<Mutex<TokenBucket>>,
}

impl AppState {
    pub fn new(pool: cctv_db::DbPool, config: ServerConfig, mailer: Arc<dyn Mailer>) -> Self {
        let bucket = TokenBucket::new(
            config.reset_limit.capacity,
            config.reset_limit.refill_interval(),
        );
        Self {
            pool,
            config: Arc::new(config),
            mailer,
            reset_limiter: Arc::new(Mutex::new(bucket)),
        }
    }
}
