use axum::routing::post;
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payment`.
///
/// ```text
/// POST /request  -> request_payment
/// POST /confirm  -> confirm_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(payment::request_payment))
        .route("/confirm", post(payment::confirm_payment))
}
