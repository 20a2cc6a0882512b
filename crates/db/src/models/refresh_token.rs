//! Refresh token session models.

use playscore_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `refresh_tokens` table. Only the SHA-256 hash of the
/// opaque token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
