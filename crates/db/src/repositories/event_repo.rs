//! Repository for the `events` and `event_types` tables.

use playscore_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{EventRecord, EventType};

/// Column list for `event_types` queries.
const TYPE_COLUMNS: &str = "id, name, description, created_at";

/// Column list for `events` queries.
const EVENT_COLUMNS: &str =
    "id, event_type_id, source_entity_type, source_entity_id, actor_user_id, payload, created_at";

/// Provides durable event storage.
pub struct EventRepo;

impl EventRepo {
    /// Resolve an event type by its dot-separated name.
    pub async fn get_event_type_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<EventType>, sqlx::Error> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM event_types WHERE name = $1");
        sqlx::query_as::<_, EventType>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Insert an event row, returning the generated id.
    pub async fn insert(
        pool: &PgPool,
        event_type_id: DbId,
        source_entity_type: Option<&str>,
        source_entity_id: Option<DbId>,
        actor_user_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO events
                (event_type_id, source_entity_type, source_entity_id, actor_user_id, payload)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(event_type_id)
        .bind(source_entity_type)
        .bind(source_entity_id)
        .bind(actor_user_id)
        .bind(payload)
        .fetch_one(pool)
        .await
    }

    /// Most recent events, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<EventRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC LIMIT $1"
        );
        sqlx::query_as::<_, EventRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
