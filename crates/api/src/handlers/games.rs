//! Game catalogue and submission lifecycle handlers.
//!
//! Developers create drafts, submit them for review, and resubmit after a
//! rejection. Admins approve or reject pending submissions. All lifecycle
//! transitions are compare-and-set updates; a lost race surfaces as a 409.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use playscore_core::error::CoreError;
use playscore_core::game_status::{STATUS_DRAFT, STATUS_REJECTED};
use playscore_core::roles::ROLE_ADMIN;
use playscore_core::types::DbId;
use playscore_db::models::game::{CreateGame, Game, RejectGameRequest, UpdateGame};
use playscore_db::repositories::{EvaluationRepo, GameRepo};
use playscore_events::PlatformEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireDeveloper};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for game listings.
const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound on the page size a client may request.
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListGamesQuery {
    #[serde(default)]
    pub featured: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

/// Derive a URL slug from a game title.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "game", id })
}

/// Load a game and verify the caller owns it (or is an admin).
async fn load_owned(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Game> {
    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if game.developer_id != user.user_id && user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this game".into(),
        )));
    }
    Ok(game)
}

/// GET /api/v1/games
///
/// Public listing of published games.
pub async fn list_published(
    State(state): State<AppState>,
    Query(q): Query<ListGamesQuery>,
) -> AppResult<Json<DataResponse<Vec<Game>>>> {
    let (limit, offset) = page(q.limit, q.offset);
    let games = GameRepo::list_published(&state.pool, q.featured, limit, offset).await?;
    Ok(Json(DataResponse::new(games)))
}

/// GET /api/v1/games/{id}
///
/// Public detail view. Each fetch of a published game increments its view
/// counter; drafts and pending games are only visible to their owner and
/// admins (via the developer listing), so non-published games 404 here.
pub async fn get_published(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Game>>> {
    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|g| g.status == playscore_core::game_status::STATUS_PUBLISHED)
        .ok_or_else(|| not_found(id))?;

    GameRepo::increment_view_count(&state.pool, id).await?;
    Ok(Json(DataResponse::new(game)))
}

/// GET /api/v1/games/{id}/summary
///
/// Aggregate rating summary (count and average) for a game.
pub async fn rating_summary(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<playscore_db::models::evaluation::RatingSummary>>> {
    GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let summary = EvaluationRepo::rating_summary(&state.pool, id).await?;
    Ok(Json(DataResponse::new(summary)))
}

/// GET /api/v1/my/games
///
/// All games owned by the authenticated developer, any status.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireDeveloper(user): RequireDeveloper,
) -> AppResult<Json<DataResponse<Vec<Game>>>> {
    let games = GameRepo::list_for_developer(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(games)))
}

/// POST /api/v1/games
///
/// Creates a new draft owned by the authenticated developer.
pub async fn create(
    State(state): State<AppState>,
    RequireDeveloper(user): RequireDeveloper,
    Json(body): Json<CreateGame>,
) -> AppResult<Json<DataResponse<Game>>> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".into(),
        )));
    }
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must contain at least one alphanumeric character".into(),
        )));
    }

    let game = GameRepo::create(&state.pool, user.user_id, &slug, &body).await?;
    tracing::info!(game_id = game.id, developer_id = user.user_id, "game draft created");
    Ok(Json(DataResponse::new(game)))
}

/// PATCH /api/v1/games/{id}
///
/// Owner-only partial update. Only drafts and rejected games are editable;
/// pending and published games must go back through the workflow.
pub async fn update(
    State(state): State<AppState>,
    RequireDeveloper(user): RequireDeveloper,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateGame>,
) -> AppResult<Json<DataResponse<Game>>> {
    let game = load_owned(&state, &user, id).await?;
    if game.status != STATUS_DRAFT && game.status != STATUS_REJECTED {
        return Err(AppError::Core(CoreError::Conflict(
            "Only draft or rejected games can be edited".into(),
        )));
    }
    if body.is_featured.is_some() && user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only admins can feature a game".into(),
        )));
    }

    let updated = GameRepo::update(&state.pool, id, &body)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(updated)))
}

/// DELETE /api/v1/games/{id}
///
/// Owner or admin soft delete.
pub async fn delete(
    State(state): State<AppState>,
    RequireDeveloper(user): RequireDeveloper,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    load_owned(&state, &user, id).await?;
    let deleted = GameRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    tracing::info!(game_id = id, "game soft deleted");
    Ok(Json(DataResponse::new(serde_json::json!({ "deleted": true }))))
}

/// POST /api/v1/games/{id}/submit
///
/// Moves a draft into the pending review queue and notifies admins.
pub async fn submit(
    State(state): State<AppState>,
    RequireDeveloper(user): RequireDeveloper,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Game>>> {
    let game = load_owned(&state, &user, id).await?;

    let moved = GameRepo::submit(&state.pool, id).await?;
    if !moved {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Game cannot be submitted from status '{}'",
            game.status
        ))));
    }

    state.event_bus.publish(
        PlatformEvent::new("game.submitted")
            .with_source("game", id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({
                "title": game.title,
                "url": "/admin/games/pending",
            })),
    );

    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(game)))
}

/// POST /api/v1/games/{id}/resubmit
///
/// Returns a rejected game to the pending queue. The previous rejection
/// feedback is cleared by the transition.
pub async fn resubmit(
    State(state): State<AppState>,
    RequireDeveloper(user): RequireDeveloper,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Game>>> {
    let game = load_owned(&state, &user, id).await?;

    let moved = GameRepo::resubmit(&state.pool, id).await?;
    if !moved {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Game cannot be resubmitted from status '{}'",
            game.status
        ))));
    }

    state.event_bus.publish(
        PlatformEvent::new("game.submitted")
            .with_source("game", id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({
                "title": game.title,
                "url": "/admin/games/pending",
            })),
    );

    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(game)))
}

/// GET /api/v1/admin/games/pending
///
/// Moderation queue, oldest submission first.
pub async fn list_pending(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Game>>>> {
    let games = GameRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse::new(games)))
}

/// POST /api/v1/admin/games/{id}/approve
///
/// Publishes a pending game. The update only matches rows still in the
/// pending status, so two concurrent approvals cannot both win; the loser
/// receives a 409.
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Game>>> {
    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let moved = GameRepo::approve(&state.pool, id, admin.user_id).await?;
    if !moved {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Game cannot be approved from status '{}'",
            game.status
        ))));
    }

    state.event_bus.publish(
        PlatformEvent::new("game.approved")
            .with_source("game", id)
            .with_actor(admin.user_id)
            .with_payload(serde_json::json!({
                "owner_user_id": game.developer_id,
                "title": game.title,
                "url": format!("/games/{}", game.slug),
            })),
    );

    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(game)))
}

/// POST /api/v1/admin/games/{id}/reject
///
/// Rejects a pending game with mandatory feedback for the developer.
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(body): Json<RejectGameRequest>,
) -> AppResult<Json<DataResponse<Game>>> {
    let feedback = body.feedback.trim();
    if feedback.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Rejection feedback is required".into(),
        )));
    }

    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let moved = GameRepo::reject(&state.pool, id, feedback).await?;
    if !moved {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Game cannot be rejected from status '{}'",
            game.status
        ))));
    }

    state.event_bus.publish(
        PlatformEvent::new("game.rejected")
            .with_source("game", id)
            .with_actor(admin.user_id)
            .with_payload(serde_json::json!({
                "owner_user_id": game.developer_id,
                "title": game.title,
                "feedback": feedback,
                "url": format!("/my/games/{id}"),
            })),
    );

    let game = GameRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(game)))
}

/// GET /api/v1/admin/games/export
///
/// CSV export of the published catalogue for offline reporting.
pub async fn export_csv(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let games = GameRepo::list_all_published_for_export(&state.pool).await?;

    let mut csv = String::from("id,title,slug,developer_id,approved_at,view_count,is_featured\n");
    for game in &games {
        let approved_at = game
            .approved_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            game.id,
            csv_escape(&game.title),
            game.slug,
            game.developer_id,
            approved_at,
            game.view_count,
            game.is_featured,
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"published-games.csv\"".to_string(),
            ),
        ],
        csv,
    ))
}

/// Quote a CSV field if it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Starfall Odyssey"), "starfall-odyssey");
        assert_eq!(slugify("  Hello,  World! "), "hello-world");
        assert_eq!(slugify("Già 2: Électric"), "gi-2-lectric");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn csv_escape_quotes_fields_with_delimiters() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn page_clamps_limits() {
        assert_eq!(page(None, None), (20, 0));
        assert_eq!(page(Some(500), Some(-3)), (100, 0));
        assert_eq!(page(Some(0), Some(40)), (1, 40));
    }
}
