//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::{auth, device_reset};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register              -> register
/// POST /login                 -> login
/// POST /logout                -> logout (requires auth)
/// POST /request-device-reset  -> request_device_reset (throttled)
/// POST /confirm-device-reset  -> confirm_device_reset (throttled)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route(
            "/request-device-reset",
            post(device_reset::request_device_reset),
        )
        .route(
            "/confirm-device-reset",
            post(device_reset::confirm_device_reset),
        )
}
