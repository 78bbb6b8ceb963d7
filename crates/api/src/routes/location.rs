use axum::routing::{get, put};
use axum::Router;

use crate::handlers::location;
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(location::list).post(location::create))
        .route("/{id}", put(location::update).delete(location::delete))
}
