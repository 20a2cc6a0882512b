//! Cache-first catalog lookups with degraded-mode fallback.

use serde_json::Value;

use crate::cache::{cache_key, CacheKind, CatalogCache};
use crate::client::RawgClient;
use crate::fallback::{fallback_detail, fallback_search_results};

/// A catalog response plus the metadata clients use to interpret it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CatalogResponse {
    /// The upstream (or fallback) JSON payload.
    pub data: Value,
    /// Whether the payload came from the cache.
    pub cached: bool,
    /// Whether the upstream was unreachable and the payload is the static
    /// placeholder list.
    pub degraded: bool,
    /// The cache key this request resolved to.
    pub key: String,
}

/// Cache-fronted proxy over [`RawgClient`].
pub struct CatalogService {
    client: RawgClient,
    cache: CatalogCache,
}

impl CatalogService {
    /// Build a service over the given client with an empty cache.
    pub fn new(client: RawgClient) -> Self {
        Self {
            client,
            cache: CatalogCache::new(),
        }
    }

    /// Search the catalog, consulting the cache first.
    ///
    /// On upstream failure the static fallback list is returned with
    /// `degraded = true`; the error itself is only logged. Degraded
    /// responses are never cached, so the next request retries upstream.
    pub async fn search(&self, query: &str, filters: &[(String, String)]) -> CatalogResponse {
        let key = cache_key(CacheKind::Search, query, filters);

        if let Some(data) = self.cache.get(&key).await {
            return CatalogResponse {
                data,
                cached: true,
                degraded: false,
                key,
            };
        }

        match self.client.search(query, filters).await {
            Ok(data) => {
                let ttl = CatalogCache::search_ttl(filters);
                self.cache
                    .insert(CacheKind::Search, key.clone(), data.clone(), ttl)
                    .await;
                CatalogResponse {
                    data,
                    cached: false,
                    degraded: false,
                    key,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, query = query, "RAWG search failed, serving fallback");
                CatalogResponse {
                    data: fallback_search_results(),
                    cached: false,
                    degraded: true,
                    key,
                }
            }
        }
    }

    /// Fetch a single game by RAWG id, consulting the cache first.
    pub async fn get(&self, rawg_id: i64) -> CatalogResponse {
        let key = cache_key(CacheKind::Detail, &rawg_id.to_string(), &[]);

        if let Some(data) = self.cache.get(&key).await {
            return CatalogResponse {
                data,
                cached: true,
                degraded: false,
                key,
            };
        }

        match self.client.get(rawg_id).await {
            Ok(data) => {
                self.cache
                    .insert(
                        CacheKind::Detail,
                        key.clone(),
                        data.clone(),
                        CatalogCache::detail_ttl(),
                    )
                    .await;
                CatalogResponse {
                    data,
                    cached: false,
                    degraded: false,
                    key,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, rawg_id = rawg_id, "RAWG detail failed, serving fallback");
                CatalogResponse {
                    data: fallback_detail(rawg_id),
                    cached: false,
                    degraded: true,
                    key,
                }
            }
        }
    }

    /// Best-effort cache invalidation. Returns the number of registry keys
    /// cleared.
    pub async fn clear_cache(&self, kind: Option<CacheKind>) -> usize {
        let cleared = self.cache.clear(kind).await;
        tracing::info!(cleared = cleared, kind = ?kind, "Catalog cache cleared");
        cleared
    }
}
