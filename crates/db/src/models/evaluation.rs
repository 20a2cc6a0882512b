//! Evaluation (rating + optional review) entity models and DTOs.

use playscore_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `evaluations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Evaluation {
    pub id: DbId,
    pub game_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub review: Option<String>,
    pub is_approved: bool,
    pub is_flagged: bool,
    pub flag_reason: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for posting an evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvaluation {
    pub rating: i32,
    pub review: Option<String>,
}

/// Request body for updating one's own evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEvaluation {
    pub rating: Option<i32>,
    pub review: Option<String>,
}

/// Aggregate rating summary for a game.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatingSummary {
    pub evaluation_count: i64,
    pub average_rating: Option<f64>,
}
