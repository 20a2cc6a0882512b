//! Route definitions for the `/catalog` proxy.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/catalog`.
///
/// ```text
/// GET /search            -> search (public, cached)
/// GET /games/{rawg_id}   -> detail (public, cached)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(catalog::search))
        .route("/games/{rawg_id}", get(catalog::detail))
}
