//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `cctv_db` (or to
//! [`crate::visibility`]) and map errors via [`crate::error::AppError`].

pub mod account;
pub mod auth;
pub mod cctv;
pub mod device_reset;
pub mod health;
pub mod location;
pub mod payment;
