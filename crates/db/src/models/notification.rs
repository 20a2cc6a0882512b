//! Notification entity models and DTOs.

use playscore_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// The payload shape mirrors what clients render:
/// `{type, message_key, message_params, url, for_roles, read_at}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: Option<DbId>,
    pub notification_type: String,
    pub message_key: String,
    pub message_params: serde_json::Value,
    pub url: String,
    pub for_roles: serde_json::Value,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Payload for inserting a notification, shared by all fan-out targets.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub event_id: Option<DbId>,
    pub notification_type: String,
    pub message_key: String,
    pub message_params: serde_json::Value,
    pub url: String,
    pub for_roles: Vec<String>,
}
