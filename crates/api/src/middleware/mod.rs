//! Request extractors that gate access before a handler runs.
//!
//! - [`auth`] -- the session guard ([`auth::AuthUser`]).
//! - [`rate_limit`] -- the device-reset throttle ([`rate_limit::ResetThrottle`]).

pub mod auth;
pub mod rate_limit;
