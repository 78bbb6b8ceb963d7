use axum::routing::get;
use axum::Router;

use crate::handlers::cctv;
use crate::state::AppState;

/// Routes mounted at `/cctvs`.
///
/// ```text
/// GET    /      -> list (tier-aware, optional ?locationId=)
/// POST   /      -> create
/// GET    /{id}  -> get_by_id (tier-aware)
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cctv::list).post(cctv::create))
        .route(
            "/{id}",
            get(cctv::get_by_id).put(cctv::update).delete(cctv::delete),
        )
}
