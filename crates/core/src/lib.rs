//! Domain primitives for the CCTV directory service.
//!
//! Nothing in this crate performs I/O: it holds the shared error type, id and
//! timestamp aliases, role and tier vocabularies, the visibility decision
//! rules, and the in-process rate limiter used by the API layer.

pub mod error;
pub mod patch;
pub mod rate_limit;
pub mod roles;
pub mod tier;
pub mod types;
