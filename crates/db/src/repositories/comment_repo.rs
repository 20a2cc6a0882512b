//! Repository for the `comments` table.

use playscore_core::moderation::ModerationOutcome;
use playscore_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::Comment;

/// Column list for `comments` queries.
const COLUMNS: &str = "id, game_id, user_id, parent_id, content, is_approved, is_flagged, \
    flag_reason, deleted_at, created_at, updated_at";

/// Provides CRUD and moderation operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment. Defaults to unapproved and unflagged.
    pub async fn create(
        pool: &PgPool,
        game_id: DbId,
        user_id: DbId,
        parent_id: Option<DbId>,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (game_id, user_id, parent_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(game_id)
            .bind(user_id)
            .bind(parent_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List comments for a game, oldest first.
    ///
    /// When `approved_only` is `true` (the public view), only approved
    /// comments are returned; moderators pass `false` to see everything.
    pub async fn list_for_game(
        pool: &PgPool,
        game_id: DbId,
        approved_only: bool,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let filter = if approved_only {
            "AND is_approved = true"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE game_id = $1 AND deleted_at IS NULL {filter}
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(game_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a moderation outcome in a single update.
    ///
    /// The write sets both flags together so the row can never end up both
    /// approved and flagged. Returns the updated row, or `None` if the
    /// comment no longer exists.
    pub async fn moderate(
        pool: &PgPool,
        id: DbId,
        outcome: ModerationOutcome,
        flag_reason: Option<&str>,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments
             SET is_approved = $2, is_flagged = $3, flag_reason = $4, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(outcome.is_approved)
            .bind(outcome.is_flagged)
            .bind(flag_reason)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a comment.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
