//! Comment entity models and DTOs.

use playscore_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub game_id: DbId,
    pub user_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub is_approved: bool,
    pub is_flagged: bool,
    pub flag_reason: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for posting a comment on a game.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub content: String,
    /// When set, this comment is a reply. The parent must be a top-level
    /// comment on the same game.
    pub parent_id: Option<DbId>,
}

/// Request body for flagging a comment or evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct FlagRequest {
    pub reason: String,
}
