//! Durable event persistence.
//!
//! [`EventPersistence::persist`] writes a [`PlatformEvent`] to the `events`
//! table. The notification dispatcher calls it for every event it consumes,
//! before fan-out, so persisted notifications can reference the durable
//! event row.

use playscore_core::types::DbId;
use playscore_db::repositories::EventRepo;
use playscore_db::DbPool;

use crate::bus::PlatformEvent;

/// Writes platform events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Write a single event to the `events` table.
    ///
    /// Resolves the `event_type` name to its `event_types.id` foreign key,
    /// then inserts a row via [`EventRepo::insert`]. Returns the new row id.
    /// Fails with `RowNotFound` for event types missing from the catalog.
    pub async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        let event_type = EventRepo::get_event_type_by_name(pool, &event.event_type)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        EventRepo::insert(
            pool,
            event_type.id,
            event.source_entity_type.as_deref(),
            event.source_entity_id,
            event.actor_user_id,
            &event.payload,
        )
        .await
    }
}
