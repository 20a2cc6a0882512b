//! Route definitions for the `/evaluations` resource.

use axum::routing::patch;
use axum::Router;

use crate::handlers::evaluations;
use crate::state::AppState;

/// Routes mounted at `/evaluations`.
///
/// ```text
/// PATCH  /{id} -> update (owner)
/// DELETE /{id} -> delete (author or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", patch(evaluations::update).delete(evaluations::delete))
}
