//! Durable platform event models.

use playscore_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `event_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventType {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventRecord {
    pub id: DbId,
    pub event_type_id: DbId,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
