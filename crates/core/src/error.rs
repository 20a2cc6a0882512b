//! Domain-level error type shared across all PlayScore crates.

use crate::types::DbId;

/// Errors produced by domain logic and repositories.
///
/// The API layer maps each variant to an HTTP status code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id found nothing.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"Game"`.
        entity: &'static str,
        /// The id that was looked up.
        id: DbId,
    },

    /// Input failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request conflicts with current state (duplicate, lost race).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
