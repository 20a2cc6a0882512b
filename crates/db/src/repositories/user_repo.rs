//! Repository for the `users` table, including maintenance operations.

use playscore_core::account_status::{ACCOUNT_ACTIVE, ACCOUNT_DELETED};
use playscore_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, IntegrityFinding, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, email, display_name, password_hash, account_status, \
    email_verified_at, deleted_at, created_at, updated_at";

/// Provides CRUD and account-maintenance operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user account (status `active`).
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id, regardless of account status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email address, regardless of account status.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Set a user's account status. Deleting stamps `deleted_at`; restoring
    /// to active clears it.
    pub async fn set_account_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users
             SET account_status = $2,
                 deleted_at = CASE WHEN $2 = $3 THEN NOW() ELSE NULL END,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .bind(ACCOUNT_DELETED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a deleted account to active, clearing `deleted_at`.
    ///
    /// Returns `false` if the account exists but is not deleted.
    pub async fn restore(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users
             SET account_status = $2, deleted_at = NULL, updated_at = NOW()
             WHERE email = $1 AND account_status = $3",
        )
        .bind(email)
        .bind(ACCOUNT_ACTIVE)
        .bind(ACCOUNT_DELETED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp `email_verified_at` for an account.
    pub async fn mark_email_verified(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users
             SET email_verified_at = NOW(), updated_at = NOW()
             WHERE email = $1 AND email_verified_at IS NULL",
        )
        .bind(email)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Email addresses of every active user holding the given role.
    /// Used by the notification dispatcher for role-cohort fan-out.
    pub async fn emails_for_role(pool: &PgPool, role: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT u.email FROM users u
             JOIN user_roles ur ON ur.user_id = u.id
             JOIN roles r ON r.id = ur.role_id
             WHERE r.name = $1 AND u.account_status = $2",
        )
        .bind(role)
        .bind(ACCOUNT_ACTIVE)
        .fetch_all(pool)
        .await
    }

    /// Ids of every active user holding the given role.
    pub async fn ids_for_role(pool: &PgPool, role: &str) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT u.id FROM users u
             JOIN user_roles ur ON ur.user_id = u.id
             JOIN roles r ON r.id = ur.role_id
             WHERE r.name = $1 AND u.account_status = $2",
        )
        .bind(role)
        .bind(ACCOUNT_ACTIVE)
        .fetch_all(pool)
        .await
    }

    /// Scan for account integrity problems: users with no role assignment,
    /// and status/deleted_at disagreements.
    pub async fn integrity_scan(pool: &PgPool) -> Result<Vec<IntegrityFinding>, sqlx::Error> {
        sqlx::query_as::<_, IntegrityFinding>(
            "SELECT u.id AS user_id, u.email, 'missing role assignment' AS problem
             FROM users u
             WHERE NOT EXISTS (SELECT 1 FROM user_roles ur WHERE ur.user_id = u.id)
             UNION ALL
             SELECT u.id, u.email, 'deleted status without deleted_at'
             FROM users u
             WHERE u.account_status = 'deleted' AND u.deleted_at IS NULL
             UNION ALL
             SELECT u.id, u.email, 'deleted_at set on non-deleted account'
             FROM users u
             WHERE u.account_status <> 'deleted' AND u.deleted_at IS NOT NULL
             ORDER BY 1",
        )
        .fetch_all(pool)
        .await
    }

    /// Repair the problems reported by [`integrity_scan`](Self::integrity_scan):
    /// assign the default role where missing and reconcile deleted_at with
    /// account status. Returns the number of rows touched.
    pub async fn integrity_fix(pool: &PgPool, default_role: &str) -> Result<u64, sqlx::Error> {
        let mut fixed = 0;

        let result = sqlx::query(
            "INSERT INTO user_roles (user_id, role_id)
             SELECT u.id, r.id FROM users u, roles r
             WHERE r.name = $1
               AND NOT EXISTS (SELECT 1 FROM user_roles ur WHERE ur.user_id = u.id)",
        )
        .bind(default_role)
        .execute(pool)
        .await?;
        fixed += result.rows_affected();

        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW()
             WHERE account_status = 'deleted' AND deleted_at IS NULL",
        )
        .execute(pool)
        .await?;
        fixed += result.rows_affected();

        let result = sqlx::query(
            "UPDATE users SET deleted_at = NULL, updated_at = NOW()
             WHERE account_status <> 'deleted' AND deleted_at IS NOT NULL",
        )
        .execute(pool)
        .await?;
        fixed += result.rows_affected();

        Ok(fixed)
    }
}
