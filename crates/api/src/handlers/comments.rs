//! Comment handlers: posting, listing, moderation.
//!
//! New comments start unapproved and invisible to the public until an admin
//! approves them. Replies are limited to a single level of nesting.

use axum::extract::{Path, State};
use axum::Json;
use playscore_core::error::CoreError;
use playscore_core::game_status::STATUS_PUBLISHED;
use playscore_core::moderation::{self, ModerationAction};
use playscore_core::roles::ROLE_ADMIN;
use playscore_core::types::DbId;
use playscore_db::models::comment::{Comment, CreateComment, FlagRequest};
use playscore_db::repositories::{CommentRepo, GameRepo};
use playscore_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "comment",
        id,
    })
}

/// POST /api/v1/games/{game_id}/comments
///
/// Posts a comment (or single-level reply) on a published game. The new
/// comment awaits moderation and admins are notified.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<DbId>,
    Json(body): Json<CreateComment>,
) -> AppResult<Json<DataResponse<Comment>>> {
    let content = body.content.trim();
    moderation::validate_content(content).map_err(AppError::Core)?;

    let game = GameRepo::find_by_id(&state.pool, game_id)
        .await?
        .filter(|g| g.status == STATUS_PUBLISHED)
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "game",
            id: game_id,
        }))?;

    if let Some(parent_id) = body.parent_id {
        let parent = CommentRepo::find_by_id(&state.pool, parent_id)
            .await?
            .ok_or_else(|| not_found(parent_id))?;
        if parent.game_id != game_id {
            return Err(AppError::Core(CoreError::Validation(
                "Parent comment belongs to a different game".into(),
            )));
        }
        if parent.parent_id.is_some() {
            return Err(AppError::Core(CoreError::Validation(
                "Replies to replies are not allowed".into(),
            )));
        }
    }

    let comment =
        CommentRepo::create(&state.pool, game_id, user.user_id, body.parent_id, content).await?;

    state.event_bus.publish(
        PlatformEvent::new("comment.created")
            .with_source("comment", comment.id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({
                "title": game.title,
                "url": "/admin/moderation/comments",
            })),
    );

    Ok(Json(DataResponse::new(comment)))
}

/// GET /api/v1/games/{game_id}/comments
///
/// Public listing returns only approved comments; admins see everything.
pub async fn list_for_game(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(game_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    let approved_only = !user.map(|u| u.role == ROLE_ADMIN).unwrap_or(false);
    let comments = CommentRepo::list_for_game(&state.pool, game_id, approved_only).await?;
    Ok(Json(DataResponse::new(comments)))
}

/// DELETE /api/v1/comments/{id}
///
/// The author or an admin can soft-delete a comment.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if comment.user_id != user.user_id && user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this comment".into(),
        )));
    }

    CommentRepo::soft_delete(&state.pool, id).await?;
    Ok(Json(DataResponse::new(serde_json::json!({ "deleted": true }))))
}

/// POST /api/v1/admin/comments/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Comment>>> {
    moderate(&state, admin.user_id, id, ModerationAction::Approve).await
}

/// POST /api/v1/admin/comments/{id}/flag
///
/// Flags a comment as inappropriate. A non-empty reason is mandatory.
pub async fn flag(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(body): Json<FlagRequest>,
) -> AppResult<Json<DataResponse<Comment>>> {
    moderate(
        &state,
        admin.user_id,
        id,
        ModerationAction::Flag { reason: body.reason },
    )
    .await
}

async fn moderate(
    state: &AppState,
    admin_id: DbId,
    id: DbId,
    action: ModerationAction,
) -> AppResult<Json<DataResponse<Comment>>> {
    let outcome = action.resolve().map_err(AppError::Core)?;
    let reason = action.flag_reason();

    let comment = CommentRepo::moderate(&state.pool, id, outcome, reason)
        .await?
        .ok_or_else(|| not_found(id))?;

    let game_title = GameRepo::find_by_id(&state.pool, comment.game_id)
        .await?
        .map(|g| g.title)
        .unwrap_or_default();

    let (event_type, payload) = match &action {
        ModerationAction::Approve => (
            "comment.approved",
            serde_json::json!({
                "owner_user_id": comment.user_id,
                "title": game_title,
                "url": format!("/games/{}#comment-{}", comment.game_id, comment.id),
            }),
        ),
        ModerationAction::Flag { reason } => (
            "comment.flagged",
            serde_json::json!({
                "owner_user_id": comment.user_id,
                "title": game_title,
                "reason": reason,
                "url": "/my/comments",
            }),
        ),
    };

    state.event_bus.publish(
        PlatformEvent::new(event_type)
            .with_source("comment", comment.id)
            .with_actor(admin_id)
            .with_payload(payload),
    );

    Ok(Json(DataResponse::new(comment)))
}
