//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20260301000001_create_users_table.sql`.

pub const ROLE_USER: &str = "user";
pub const ROLE_DEVELOPER: &str = "developer";
pub const ROLE_ADMIN: &str = "admin";

/// Role assigned to every self-registered account.
pub const DEFAULT_ROLE: &str = ROLE_USER;

/// Every role the `users.role` column accepts.
pub const ALL_ROLES: [&str; 3] = [ROLE_USER, ROLE_DEVELOPER, ROLE_ADMIN];

/// Returns `true` if `role` is one of [`ALL_ROLES`].
pub fn is_known_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}
