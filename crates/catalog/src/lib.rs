//! Cached proxy in front of the RAWG game-metadata API.
//!
//! [`CatalogService`] answers search and detail requests from a keyed TTL
//! cache before touching the upstream HTTP API, and degrades to a static
//! placeholder list when the upstream is unreachable. Callers never see an
//! upstream error; responses carry `cached` / `degraded` metadata instead.

pub mod cache;
pub mod client;
pub mod fallback;
pub mod service;

pub use cache::{cache_key, CacheKind, CatalogCache};
pub use client::{RawgClient, RawgConfig, RawgError};
pub use service::{CatalogResponse, CatalogService};
