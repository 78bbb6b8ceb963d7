pub mod account;
pub mod auth;
pub mod cctv;
pub mod health;
pub mod location;
pub mod payment;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /health                                  service health (public)
///
/// /auth/register                           register (public)
/// /auth/login                              login (public)
/// /auth/logout                             logout (requires auth)
/// /auth/request-device-reset               email a reset token (throttled)
/// /auth/confirm-device-reset               unbind device (throttled)
///
/// /public/locations                        list locations
/// /public/cctvs                            preview of active CCTVs
/// /public/cctvs/{id}                       single CCTV
///
/// /locations                               list, create (requires auth)
/// /locations/{id}                          update, delete
///
/// /cctvs                                   tier-aware list, create (requires auth)
/// /cctvs/{id}                              get, update, delete
///
/// /account                                 current profile (requires auth)
/// /account/upgrade                         switch to paid tier
///
/// /payment/request                         simulated payment order (requires auth)
/// /payment/confirm                         confirm payment, upgrades tier
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/public", public::router())
        .nest("/locations", location::router())
        .nest("/cctvs", cctv::router())
        .nest("/account", account::router())
        .nest("/payment", payment::router())
}
