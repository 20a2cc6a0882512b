//! Game submission lifecycle statuses and transition rules.
//!
//! A game moves draft -> pending -> published, or pending -> rejected and
//! back to pending on resubmission. A draft can never jump straight to
//! published. Repositories additionally enforce transitions with a
//! compare-and-swap on the status column, so two concurrent moderators
//! cannot both win the same transition.

use crate::error::CoreError;

/// Game is being edited by its developer and is not visible to anyone else.
pub const STATUS_DRAFT: &str = "draft";

/// Game is waiting in the moderation queue.
pub const STATUS_PENDING: &str = "pending";

/// Game passed moderation and is publicly visible.
pub const STATUS_PUBLISHED: &str = "published";

/// Game failed moderation; the developer received feedback and may resubmit.
pub const STATUS_REJECTED: &str = "rejected";

/// All valid game status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_PENDING,
    STATUS_PUBLISHED,
    STATUS_REJECTED,
];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid game status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Whether moving a game from `from` to `to` is a legal lifecycle step.
pub fn is_legal_transition(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        (STATUS_DRAFT, STATUS_PENDING)
            | (STATUS_PENDING, STATUS_PUBLISHED)
            | (STATUS_PENDING, STATUS_REJECTED)
            | (STATUS_REJECTED, STATUS_PENDING)
    )
}

/// Validate a status transition, returning a domain error on illegal moves.
pub fn validate_transition(from: &str, to: &str) -> Result<(), CoreError> {
    validate_status(from)?;
    validate_status(to)?;
    if is_legal_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Illegal game status transition '{from}' -> '{to}'"
        )))
    }
}
