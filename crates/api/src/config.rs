use std::str::FromStr;
use std::time::Duration;

use cctv_db::PoolSettings;

use crate::auth::jwt::JwtConfig;
use crate::mail::EmailConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` and `JWT_SECRET` has a default suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database: DatabaseConfig,
    /// JWT signing secret and token lifetime.
    pub jwt: JwtConfig,
    /// Global throttle on the device-reset endpoints.
    pub reset_limit: ResetLimitConfig,
    /// SMTP settings; `None` disables outbound email.
    pub email: Option<EmailConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// # Panics
    ///
    /// Panics on any malformed value, or if a required variable is missing.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_env("PORT", 8080);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", 30);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            reset_limit: ResetLimitConfig::from_env(),
            email: EmailConfig::from_env(),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub max_lifetime_secs: u64,
    pub connect_retries: u32,
    pub retry_delay_secs: u64,
}

impl DatabaseConfig {
    /// | Env Var                | Required | Default |
    /// |------------------------|----------|---------|
    /// | `DATABASE_URL`         | **yes**  | --      |
    /// | `DB_MAX_CONNECTIONS`   | no       | `25`    |
    /// | `DB_MAX_LIFETIME_SECS` | no       | `300`   |
    /// | `DB_CONNECT_RETRIES`   | no       | `5`     |
    /// | `DB_RETRY_DELAY_SECS`  | no       | `2`     |
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let defaults = PoolSettings::default();
        Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", defaults.max_connections),
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", defaults.max_lifetime.as_secs()),
            connect_retries: parse_env("DB_CONNECT_RETRIES", defaults.connect_attempts),
            retry_delay_secs: parse_env("DB_RETRY_DELAY_SECS", defaults.retry_delay.as_secs()),
        }
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            max_lifetime: Duration::from_secs(self.max_lifetime_secs),
            connect_attempts: self.connect_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

/// Token-bucket parameters for the device-reset endpoints.
#[derive(Debug, Clone)]
pub struct ResetLimitConfig {
    /// Burst size (default: `3`).
    pub capacity: u32,
    /// Seconds to regain one request (default: `3600`).
    pub refill_secs: u64,
}

impl Default for ResetLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 3,
            refill_secs: 3600,
        }
    }
}

impl ResetLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let capacity: u32 = parse_env("RESET_LIMIT_CAPACITY", defaults.capacity);
        let refill_secs: u64 = parse_env("RESET_LIMIT_REFILL_SECS", defaults.refill_secs);
        assert!(capacity > 0, "RESET_LIMIT_CAPACITY must be positive");
        assert!(refill_secs > 0, "RESET_LIMIT_REFILL_SECS must be positive");
        Self {
            capacity,
            refill_secs,
        }
    }

    pub fn refill_interval(&self) -> Duration {
        Duration::from_secs(self.refill_secs)
    }
}

/// Read `key` from the environment, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse as `T`.
fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
