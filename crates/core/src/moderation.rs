//! Moderation decisions for user-generated content.
//!
//! Comments and reviewed evaluations are created unapproved and unflagged,
//! then pass through an admin moderation gate. The approved and flagged
//! flags are mutually exclusive: a single moderation action always leaves
//! the row in exactly one of the two states (or neither, before review).

use crate::error::CoreError;

/// Maximum length for a comment body or evaluation review.
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Maximum length for a flag reason.
pub const MAX_FLAG_REASON_LENGTH: usize = 1_000;

/// A moderation action applied to a comment or evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationAction {
    /// Approve for public display. Clears any existing flag.
    Approve,
    /// Flag with a reason. Removes the row from public display.
    Flag {
        /// Why the content was flagged. Must be non-empty.
        reason: String,
    },
}

/// The flag state a moderation action resolves to.
///
/// `approved` and `flagged` are never both true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationOutcome {
    pub is_approved: bool,
    pub is_flagged: bool,
}

impl ModerationAction {
    /// Validate the action and compute the resulting flag state.
    pub fn resolve(&self) -> Result<ModerationOutcome, CoreError> {
        match self {
            ModerationAction::Approve => Ok(ModerationOutcome {
                is_approved: true,
                is_flagged: false,
            }),
            ModerationAction::Flag { reason } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(CoreError::Validation(
                        "Flagging requires a non-empty reason".into(),
                    ));
                }
                if reason.len() > MAX_FLAG_REASON_LENGTH {
                    return Err(CoreError::Validation(format!(
                        "Flag reason exceeds {MAX_FLAG_REASON_LENGTH} characters"
                    )));
                }
                Ok(ModerationOutcome {
                    is_approved: false,
                    is_flagged: true,
                })
            }
        }
    }

    /// The reason string carried by a flag action, if any.
    pub fn flag_reason(&self) -> Option<&str> {
        match self {
            ModerationAction::Approve => None,
            ModerationAction::Flag { reason } => Some(reason.trim()),
        }
    }
}

/// Validate free-text content length for comments and reviews.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Content must not be empty".into()));
    }
    if trimmed.len() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Content exceeds {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}
