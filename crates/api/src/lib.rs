//! CCTV directory API server library.
//!
//! Exposes the building blocks (config, state, error handling, extractors,
//! handlers, routes) so integration tests and the binary entrypoint share
//! the same wiring.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod visibility;
