use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: playscore_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<playscore_events::EventBus>,
    /// Cached proxy over the RAWG catalog API.
    pub catalog: Arc<playscore_catalog::CatalogService>,
}
