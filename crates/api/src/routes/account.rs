use axum::routing::{get, post};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/account`.
///
/// ```text
/// GET  /         -> me
/// POST /upgrade  -> upgrade
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(account::me))
        .route("/upgrade", post(account::upgrade))
}
