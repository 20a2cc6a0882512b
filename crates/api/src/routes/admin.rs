//! Route definitions for the `/admin` surface.
//!
//! Every handler behind this router requires the admin role via the
//! `RequireAdmin` extractor.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{catalog, comments, evaluations, games, maintenance};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /games/pending                 -> games::list_pending
/// GET  /games/export                  -> games::export_csv
/// POST /games/{id}/approve            -> games::approve
/// POST /games/{id}/reject             -> games::reject
///
/// POST /comments/{id}/approve         -> comments::approve
/// POST /comments/{id}/flag            -> comments::flag
///
/// POST /evaluations/{id}/approve      -> evaluations::approve
/// POST /evaluations/{id}/flag         -> evaluations::flag
/// POST /evaluations/bulk-approve      -> evaluations::bulk_approve
///
/// GET  /users/integrity               -> maintenance::integrity_check
/// POST /users/integrity/fix           -> maintenance::integrity_fix
/// POST /users/{email}/restore         -> maintenance::restore_user
/// POST /users/{email}/verify-email    -> maintenance::verify_admin_email
///
/// POST /catalog/cache/clear           -> catalog::clear_cache
///
/// GET  /events                        -> maintenance::recent_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Moderation queue and lifecycle decisions
        .route("/games/pending", get(games::list_pending))
        .route("/games/export", get(games::export_csv))
        .route("/games/{id}/approve", post(games::approve))
        .route("/games/{id}/reject", post(games::reject))
        // Content moderation
        .route("/comments/{id}/approve", post(comments::approve))
        .route("/comments/{id}/flag", post(comments::flag))
        .route("/evaluations/{id}/approve", post(evaluations::approve))
        .route("/evaluations/{id}/flag", post(evaluations::flag))
        .route("/evaluations/bulk-approve", post(evaluations::bulk_approve))
        // Account maintenance
        .route("/users/integrity", get(maintenance::integrity_check))
        .route("/users/integrity/fix", post(maintenance::integrity_fix))
        .route("/users/{email}/restore", post(maintenance::restore_user))
        .route(
            "/users/{email}/verify-email",
            post(maintenance::verify_admin_email),
        )
        // Catalog cache administration
        .route("/catalog/cache/clear", post(catalog::clear_cache))
        // Event audit log
        .route("/events", get(maintenance::recent_events))
}
