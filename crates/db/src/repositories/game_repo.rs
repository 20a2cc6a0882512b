//! Repository for the `games` table, including the submission lifecycle.
//!
//! Lifecycle transitions use compare-and-swap updates: the `WHERE status =`
//! guard means a concurrent moderator that lost the race matches zero rows,
//! which the caller surfaces as a 409 instead of silently double-applying.

use playscore_core::game_status::{
    STATUS_DRAFT, STATUS_PENDING, STATUS_PUBLISHED, STATUS_REJECTED,
};
use playscore_core::types::DbId;
use sqlx::PgPool;

use crate::models::game::{CreateGame, Game, UpdateGame};

/// Column list for `games` queries.
const COLUMNS: &str = "id, developer_id, title, slug, description, release_date, cover_url, \
    status, submitted_at, approved_at, rejected_at, approved_by, rejection_feedback, \
    is_featured, view_count, deleted_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for games.
pub struct GameRepo;

impl GameRepo {
    /// Insert a new draft game owned by `developer_id`.
    pub async fn create(
        pool: &PgPool,
        developer_id: DbId,
        slug: &str,
        input: &CreateGame,
    ) -> Result<Game, sqlx::Error> {
        let query = format!(
            "INSERT INTO games (developer_id, title, slug, description, release_date, cover_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(developer_id)
            .bind(&input.title)
            .bind(slug)
            .bind(input.description.as_deref().unwrap_or(""))
            .bind(input.release_date)
            .bind(&input.cover_url)
            .fetch_one(pool)
            .await
    }

    /// Find a game by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Game>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM games WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List published games, newest approval first.
    ///
    /// When `featured_only` is `true`, only featured games are returned.
    pub async fn list_published(
        pool: &PgPool,
        featured_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Game>, sqlx::Error> {
        let filter = if featured_only {
            "AND is_featured = true"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM games
             WHERE status = '{STATUS_PUBLISHED}' AND deleted_at IS NULL {filter}
             ORDER BY approved_at DESC NULLS LAST
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List all games owned by a developer, any status.
    pub async fn list_for_developer(
        pool: &PgPool,
        developer_id: DbId,
    ) -> Result<Vec<Game>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM games
             WHERE developer_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(developer_id)
            .fetch_all(pool)
            .await
    }

    /// List games awaiting moderation, oldest submission first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Game>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM games
             WHERE status = '{STATUS_PENDING}' AND deleted_at IS NULL
             ORDER BY submitted_at ASC NULLS LAST"
        );
        sqlx::query_as::<_, Game>(&query).fetch_all(pool).await
    }

    /// Apply a partial update to a game's editable fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGame,
    ) -> Result<Option<Game>, sqlx::Error> {
        let query = format!(
            "UPDATE games SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                release_date = COALESCE($4, release_date),
                cover_url = COALESCE($5, cover_url),
                is_featured = COALESCE($6, is_featured),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Game>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.release_date)
            .bind(&input.cover_url)
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await
    }

    /// Submit a draft for moderation. CAS: draft -> pending.
    ///
    /// Returns `false` if the game was not in `draft` (lost race or wrong
    /// state), leaving the row untouched.
    pub async fn submit(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE games
             SET status = $2, submitted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND status = $3 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(STATUS_PENDING)
        .bind(STATUS_DRAFT)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Publish a pending game. CAS: pending -> published.
    pub async fn approve(pool: &PgPool, id: DbId, approver_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE games
             SET status = $2, approved_at = NOW(), approved_by = $3,
                 rejected_at = NULL, rejection_feedback = NULL, updated_at = NOW()
             WHERE id = $1 AND status = $4 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(STATUS_PUBLISHED)
        .bind(approver_id)
        .bind(STATUS_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reject a pending game with feedback. CAS: pending -> rejected.
    pub async fn reject(pool: &PgPool, id: DbId, feedback: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE games
             SET status = $2, rejected_at = NOW(), rejection_feedback = $3, updated_at = NOW()
             WHERE id = $1 AND status = $4 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(STATUS_REJECTED)
        .bind(feedback)
        .bind(STATUS_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resubmit a rejected game. CAS: rejected -> pending.
    pub async fn resubmit(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE games
             SET status = $2, submitted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND status = $3 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(STATUS_PENDING)
        .bind(STATUS_REJECTED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump the view counter. Detail reads call this fire-and-forget.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE games SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Soft-delete a game.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE games SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All published games for the catalog export, oldest first.
    pub async fn list_all_published_for_export(pool: &PgPool) -> Result<Vec<Game>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM games
             WHERE status = '{STATUS_PUBLISHED}' AND deleted_at IS NULL
             ORDER BY title ASC"
        );
        sqlx::query_as::<_, Game>(&query).fetch_all(pool).await
    }
}
