//! Unauthenticated read-only routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::{cctv, location};
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET /locations   -> list_public
/// GET /cctvs       -> list_public (at most 10, optional ?locationId=)
/// GET /cctvs/{id}  -> get_public
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(location::list_public))
        .route("/cctvs", get(cctv::list_public))
        .route("/cctvs/{id}", get(cctv::get_public))
}
