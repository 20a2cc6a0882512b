//! Game entity models and DTOs.

use playscore_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `games` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Game {
    pub id: DbId,
    pub developer_id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub release_date: Option<chrono::NaiveDate>,
    pub cover_url: Option<String>,
    pub status: String,
    pub submitted_at: Option<Timestamp>,
    pub approved_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
    pub approved_by: Option<DbId>,
    pub rejection_feedback: Option<String>,
    pub is_featured: bool,
    pub view_count: i64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new game draft.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGame {
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<chrono::NaiveDate>,
    pub cover_url: Option<String>,
}

/// DTO for updating an existing game. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGame {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<chrono::NaiveDate>,
    pub cover_url: Option<String>,
    pub is_featured: Option<bool>,
}

/// Request body for the reject endpoint. Feedback is mandatory.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectGameRequest {
    pub feedback: String,
}
