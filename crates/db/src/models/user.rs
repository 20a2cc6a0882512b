//! User entity models and DTOs.

use playscore_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// The password hash is kept out of serialized output.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub account_status: String,
    pub email_verified_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    /// Pre-hashed Argon2id PHC string; hashing happens in the API layer.
    pub password_hash: String,
}

/// An account integrity finding reported by the maintenance scan.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IntegrityFinding {
    pub user_id: DbId,
    pub email: String,
    pub problem: String,
}
