//! Repository for the `notifications` table.

use playscore_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, event_id, notification_type, message_key, message_params, \
    url, for_roles, read_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert one notification row per target user.
    ///
    /// Returns the number of rows created. An empty target list is a no-op.
    pub async fn create_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
        input: &CreateNotification,
    ) -> Result<u64, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        let for_roles = serde_json::to_value(&input.for_roles)
            .unwrap_or_else(|_| serde_json::Value::Array(vec![]));
        let result = sqlx::query(
            "INSERT INTO notifications
                (user_id, event_id, notification_type, message_key, message_params, url, for_roles)
             SELECT uid, $2, $3, $4, $5, $6, $7 FROM UNNEST($1::bigint[]) AS uid",
        )
        .bind(user_ids)
        .bind(input.event_id)
        .bind(&input.notification_type)
        .bind(&input.message_key)
        .bind(&input.message_params)
        .bind(&input.url)
        .bind(&for_roles)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List notifications for a user, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with a NULL
    /// `read_at` are returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND read_at IS NULL"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE user_id = $1 {filter}
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if an unread notification owned by the user was found
    /// and updated.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW()
             WHERE id = $1 AND user_id = $2 AND read_at IS NULL",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW()
             WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a notification owned by the user.
    pub async fn delete(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(notification_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
