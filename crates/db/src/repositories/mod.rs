//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod cctv_repo;
pub mod location_repo;
pub mod user_repo;

pub use cctv_repo::CctvRepo;
pub use location_repo::LocationRepo;
pub use user_repo::UserRepo;
