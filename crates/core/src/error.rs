use crate::types::DbId;

/// Failures raised by the directory's own rules, independent of transport.
///
/// Persistence and request-decoding failures have their own types at the
/// layers that produce them; this enum only carries outcomes a handler
/// decides on.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A row addressed by id does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A name or source URL is already taken, or a row is still referenced.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Credentials or session token rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the account's tier or bound device disallows it.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}
