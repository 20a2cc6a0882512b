//! Repository for the `roles` and `user_roles` tables.

use playscore_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

/// Column list for `roles` queries.
const COLUMNS: &str = "id, name, description, created_at";

/// Provides role lookup and assignment.
pub struct RoleRepo;

impl RoleRepo {
    /// Find a role by name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Assign a role to a user. A repeat assignment is a no-op.
    pub async fn assign(pool: &PgPool, user_id: DbId, role_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)
             ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// All role names held by a user, alphabetically.
    pub async fn names_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT r.name FROM roles r
             JOIN user_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = $1
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// The user's highest-privilege role for JWT claims:
    /// admin > developer > player.
    pub async fn primary_role(pool: &PgPool, user_id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT r.name FROM roles r
             JOIN user_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = $1
             ORDER BY CASE r.name
                 WHEN 'admin' THEN 0
                 WHEN 'developer' THEN 1
                 ELSE 2
             END
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}
