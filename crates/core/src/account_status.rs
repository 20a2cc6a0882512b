//! User account status state machine.
//!
//! Replaces overloaded soft-delete flag semantics with an explicit status
//! column: only `active` accounts may authenticate; a `deleted` account is
//! recoverable through the maintenance restore command.

use crate::error::CoreError;

/// Account may authenticate and use the platform.
pub const ACCOUNT_ACTIVE: &str = "active";

/// Account is blocked by an administrator; data remains visible.
pub const ACCOUNT_SUSPENDED: &str = "suspended";

/// Account was deleted by its owner or an administrator; recoverable.
pub const ACCOUNT_DELETED: &str = "deleted";

/// All valid account status values.
pub const VALID_ACCOUNT_STATUSES: &[&str] =
    &[ACCOUNT_ACTIVE, ACCOUNT_SUSPENDED, ACCOUNT_DELETED];

/// Validate that an account status string is one of the accepted values.
pub fn validate_account_status(status: &str) -> Result<(), CoreError> {
    if VALID_ACCOUNT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid account status '{status}'. Must be one of: {}",
            VALID_ACCOUNT_STATUSES.join(", ")
        )))
    }
}

/// Whether an account in the given status is allowed to authenticate.
pub fn can_authenticate(status: &str) -> bool {
    status == ACCOUNT_ACTIVE
}
