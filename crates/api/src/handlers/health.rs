use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::response::ApiResponse;
use crate::state::AppState;

/// Health check response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the database is unreachable.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let db_healthy = cctv_db::health_check(&state.pool).await.is_ok();
    let status = if db_healthy { "ok" } else { "degraded" };

    Json(ApiResponse::ok(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    }))
}
