//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Serializable views for API responses where the row holds secrets or
//!   needs reshaping
//! - Plain create/update DTOs consumed by the repositories

pub mod cctv;
pub mod location;
pub mod user;
