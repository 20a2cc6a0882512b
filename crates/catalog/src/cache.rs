//! Keyed TTL cache for catalog responses, with a key registry for
//! best-effort invalidation.
//!
//! Keys are a stable hash of the normalized request parameters. The TTL
//! varies by query specificity: filtered or paginated searches expire
//! quickly, plain searches live longer, and single-entity lookups longest.
//!
//! `clear(kind)` walks a separately tracked registry of issued keys rather
//! than the cache itself. TTL expiry is not reflected back into the
//! registry, so it can list keys that already lapsed; clearing those is a
//! harmless no-op.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// TTL for filtered or paginated search responses.
const TTL_FILTERED_SEARCH: Duration = Duration::from_secs(5 * 60);

/// TTL for plain (query-only) search responses.
const TTL_PLAIN_SEARCH: Duration = Duration::from_secs(30 * 60);

/// TTL for single-entity detail responses.
const TTL_DETAIL: Duration = Duration::from_secs(24 * 60 * 60);

/// Maximum number of cached responses.
const MAX_ENTRIES: u64 = 10_000;

/// Hex prefix length of the SHA-256 parameter hash used as cache key body.
const KEY_HASH_LEN: usize = 16;

/// What kind of request a cache entry belongs to. Also the granularity of
/// [`CatalogCache::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// `search()` responses.
    Search,
    /// `get()` detail responses.
    Detail,
}

impl CacheKind {
    /// Stable string prefix for keys of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            CacheKind::Search => "search",
            CacheKind::Detail => "detail",
        }
    }
}

/// Build the cache key for a request: `<kind>:<hash of normalized params>`.
///
/// The query is trimmed and lowercased; filters are sorted by name so that
/// parameter order does not produce distinct keys.
pub fn cache_key(kind: CacheKind, query: &str, filters: &[(String, String)]) -> String {
    let mut normalized: Vec<(String, String)> = filters
        .iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_lowercase()))
        .collect();
    normalized.sort();

    let mut hasher = Sha256::new();
    hasher.update(query.trim().to_lowercase().as_bytes());
    for (k, v) in &normalized {
        hasher.update(b"\x1f");
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    format!("{}:{}", kind.prefix(), &digest[..KEY_HASH_LEN])
}

/// A cached response together with its TTL, read by the expiry policy.
#[derive(Debug, Clone)]
struct CachedEntry {
    value: Value,
    ttl: Duration,
}

/// TTL'd response cache plus the registry of issued keys.
pub struct CatalogCache {
    entries: Cache<String, CachedEntry>,
    /// Keys handed out per kind. Drifts from the cache as TTLs lapse.
    registry: Mutex<HashMap<CacheKind, HashSet<String>>>,
}

impl CatalogCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .expire_after(PerEntryTtl)
                .build(),
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// TTL for a search with the given filter set.
    pub fn search_ttl(filters: &[(String, String)]) -> Duration {
        if filters.is_empty() {
            TTL_PLAIN_SEARCH
        } else {
            TTL_FILTERED_SEARCH
        }
    }

    /// TTL for a detail lookup.
    pub fn detail_ttl() -> Duration {
        TTL_DETAIL
    }

    /// Look up a cached response.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).await.map(|entry| entry.value)
    }

    /// Store a response under `key` with the given TTL and record the key
    /// in the registry.
    pub async fn insert(&self, kind: CacheKind, key: String, value: Value, ttl: Duration) {
        self.entries
            .insert(key.clone(), CachedEntry { value, ttl })
            .await;
        let mut registry = self.registry.lock().expect("registry lock poisoned");
        registry.entry(kind).or_default().insert(key);
    }

    /// Best-effort invalidation of every registered key of the given kind,
    /// or of all kinds when `None`. Returns the number of registry keys
    /// cleared (which may exceed the number of live cache entries).
    pub async fn clear(&self, kind: Option<CacheKind>) -> usize {
        let keys: Vec<String> = {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            match kind {
                Some(k) => registry.remove(&k).unwrap_or_default().into_iter().collect(),
                None => registry.drain().flat_map(|(_, set)| set).collect(),
            }
        };
        for key in &keys {
            self.entries.invalidate(key).await;
        }
        keys.len()
    }

    /// Number of keys currently tracked in the registry (all kinds).
    pub fn registry_len(&self) -> usize {
        let registry = self.registry.lock().expect("registry lock poisoned");
        registry.values().map(HashSet::len).sum()
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

/// moka expiry policy applying each entry's own TTL.
struct PerEntryTtl;

impl moka::Expiry<String, CachedEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CachedEntry,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}
