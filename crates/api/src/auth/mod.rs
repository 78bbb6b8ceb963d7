//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- session token issuance/validation and opaque token helpers.

pub mod jwt;
pub mod password;
