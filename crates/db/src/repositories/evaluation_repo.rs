//! Repository for the `evaluations` table.
//!
//! The `uq_evaluations_user_game` constraint enforces one evaluation per
//! (user, game) pair; the API error layer maps the resulting 23505 to 409.

use playscore_core::moderation::ModerationOutcome;
use playscore_core::types::DbId;
use sqlx::PgPool;

use crate::models::evaluation::{Evaluation, RatingSummary};

/// Column list for `evaluations` queries.
const COLUMNS: &str = "id, game_id, user_id, rating, review, is_approved, is_flagged, \
    flag_reason, deleted_at, created_at, updated_at";

/// Provides CRUD and moderation operations for evaluations.
pub struct EvaluationRepo;

impl EvaluationRepo {
    /// Insert a new evaluation. Defaults to unapproved and unflagged.
    pub async fn create(
        pool: &PgPool,
        game_id: DbId,
        user_id: DbId,
        rating: i32,
        review: Option<&str>,
    ) -> Result<Evaluation, sqlx::Error> {
        let query = format!(
            "INSERT INTO evaluations (game_id, user_id, rating, review)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(game_id)
            .bind(user_id)
            .bind(rating)
            .bind(review)
            .fetch_one(pool)
            .await
    }

    /// Find an evaluation by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Evaluation>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM evaluations WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List evaluations for a game, newest first.
    ///
    /// The public view (`approved_only = true`) includes approved rows plus
    /// rating-only rows: a bare 1-5 rating with no review text needs no
    /// moderation to be counted. A flagged rating-only row is hidden.
    pub async fn list_for_game(
        pool: &PgPool,
        game_id: DbId,
        approved_only: bool,
    ) -> Result<Vec<Evaluation>, sqlx::Error> {
        let filter = if approved_only {
            "AND (is_approved = true OR (review IS NULL AND is_flagged = false))"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM evaluations
             WHERE game_id = $1 AND deleted_at IS NULL {filter}
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(game_id)
            .fetch_all(pool)
            .await
    }

    /// Update the owner's rating and/or review text. Editing resets the
    /// moderation flags so the new text goes back through the gate.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        rating: Option<i32>,
        review: Option<&str>,
    ) -> Result<Option<Evaluation>, sqlx::Error> {
        let query = format!(
            "UPDATE evaluations
             SET rating = COALESCE($2, rating),
                 review = COALESCE($3, review),
                 is_approved = false, is_flagged = false, flag_reason = NULL,
                 updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(id)
            .bind(rating)
            .bind(review)
            .fetch_optional(pool)
            .await
    }

    /// Apply a moderation outcome in a single update, mirroring
    /// [`CommentRepo::moderate`](crate::repositories::CommentRepo::moderate).
    pub async fn moderate(
        pool: &PgPool,
        id: DbId,
        outcome: ModerationOutcome,
        flag_reason: Option<&str>,
    ) -> Result<Option<Evaluation>, sqlx::Error> {
        let query = format!(
            "UPDATE evaluations
             SET is_approved = $2, is_flagged = $3, flag_reason = $4, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(id)
            .bind(outcome.is_approved)
            .bind(outcome.is_flagged)
            .bind(flag_reason)
            .fetch_optional(pool)
            .await
    }

    /// Bulk-approve every unflagged evaluation that has review text and is
    /// still unapproved. Idempotent: a second run matches zero rows.
    ///
    /// Returns the number of evaluations approved.
    pub async fn bulk_approve_reviewed(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE evaluations
             SET is_approved = true, updated_at = NOW()
             WHERE review IS NOT NULL
               AND is_approved = false
               AND is_flagged = false
               AND deleted_at IS NULL",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Rating count and average for a game, across all non-deleted rows.
    pub async fn rating_summary(
        pool: &PgPool,
        game_id: DbId,
    ) -> Result<RatingSummary, sqlx::Error> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT COUNT(*) AS evaluation_count, AVG(rating)::float8 AS average_rating
             FROM evaluations
             WHERE game_id = $1 AND deleted_at IS NULL",
        )
        .bind(game_id)
        .fetch_one(pool)
        .await
    }

    /// Soft-delete an evaluation.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE evaluations SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
