//! Route definitions for the `/games` and `/my/games` resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{comments, evaluations, games};
use crate::state::AppState;

/// Routes mounted at `/games`.
///
/// ```text
/// GET    /                          -> list_published (public)
/// GET    /{id}                      -> get_published (public, counts a view)
/// GET    /{id}/summary              -> rating_summary (public)
/// POST   /                          -> create (developer)
/// PATCH  /{id}                      -> update (owner)
/// DELETE /{id}                      -> delete (owner or admin)
/// POST   /{id}/submit               -> submit (owner)
/// POST   /{id}/resubmit             -> resubmit (owner)
///
/// GET    /{game_id}/comments        -> comments::list_for_game
/// POST   /{game_id}/comments        -> comments::create (auth)
/// GET    /{game_id}/evaluations     -> evaluations::list_for_game
/// POST   /{game_id}/evaluations     -> evaluations::create (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(games::list_published).post(games::create))
        .route(
            "/{id}",
            get(games::get_published)
                .patch(games::update)
                .delete(games::delete),
        )
        .route("/{id}/summary", get(games::rating_summary))
        .route("/{id}/submit", post(games::submit))
        .route("/{id}/resubmit", post(games::resubmit))
        .route(
            "/{id}/comments",
            get(comments::list_for_game).post(comments::create),
        )
        .route(
            "/{id}/evaluations",
            get(evaluations::list_for_game).post(evaluations::create),
        )
}

/// Routes mounted at `/my`.
///
/// ```text
/// GET /games -> games::list_mine (developer)
/// ```
pub fn my_router() -> Router<AppState> {
    Router::new().route("/games", get(games::list_mine))
}
