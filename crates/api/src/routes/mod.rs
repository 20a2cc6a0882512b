pub mod admin;
pub mod auth;
pub mod catalog;
pub mod comments;
pub mod evaluations;
pub mod games;
pub mod health;
pub mod notifications;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
///
/// /games                               list published, create draft
/// /games/{id}                          detail, update, delete
/// /games/{id}/summary                  rating summary
/// /games/{id}/submit                   submit for review
/// /games/{id}/resubmit                 resubmit after rejection
/// /games/{id}/comments                 list, create
/// /games/{id}/evaluations              list, create
///
/// /my/games                            developer's own games
///
/// /comments/{id}                       delete
/// /evaluations/{id}                    update, delete
///
/// /notifications                       inbox for the authenticated user
///
/// /catalog/search                      cached RAWG search proxy
/// /catalog/games/{rawg_id}             cached RAWG detail proxy
///
/// /admin/...                           moderation, maintenance, cache admin
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/games", games::router())
        .nest("/my", games::my_router())
        .nest("/comments", comments::router())
        .nest("/evaluations", evaluations::router())
        .nest("/notifications", notifications::router())
        .nest("/catalog", catalog::router())
        .nest("/admin", admin::router())
}
