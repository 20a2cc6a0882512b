//! External catalogue proxy handlers backed by the RAWG cache.
//!
//! Responses always carry `cached` and `degraded` flags so clients can tell
//! live data from the static fallback served during upstream outages.

use axum::extract::{Path, Query, State};
use axum::Json;
use playscore_catalog::{CacheKind, CatalogResponse};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters accepted by the catalogue search proxy. Anything beyond
/// `q` is forwarded upstream as a filter and participates in the cache key.
#[derive(Debug, Deserialize)]
pub struct CatalogSearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(flatten)]
    pub filters: std::collections::BTreeMap<String, String>,
}

/// GET /api/v1/catalog/search
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<CatalogSearchQuery>,
) -> AppResult<Json<CatalogResponse>> {
    let filters: Vec<(String, String)> = query.filters.into_iter().collect();
    let response = state.catalog.search(&query.q, &filters).await;
    Ok(Json(response))
}

/// GET /api/v1/catalog/games/{rawg_id}
pub async fn detail(
    State(state): State<AppState>,
    Path(rawg_id): Path<i64>,
) -> AppResult<Json<CatalogResponse>> {
    let response = state.catalog.get(rawg_id).await;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct ClearCacheRequest {
    /// `"search"`, `"detail"`, or absent to clear everything.
    pub kind: Option<String>,
}

/// POST /api/v1/admin/catalog/cache/clear
///
/// Best-effort cache invalidation via the key registry.
pub async fn clear_cache(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<ClearCacheRequest>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let kind = match body.kind.as_deref() {
        None => None,
        Some("search") => Some(CacheKind::Search),
        Some("detail") => Some(CacheKind::Detail),
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "Unknown cache kind '{other}'; expected 'search' or 'detail'"
            )))
        }
    };
    let cleared = state.catalog.clear_cache(kind).await;
    tracing::info!(cleared, "catalog cache cleared");
    Ok(Json(DataResponse::new(serde_json::json!({ "cleared": cleared }))))
}
