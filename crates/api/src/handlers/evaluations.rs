//! Evaluation handlers: ratings, reviews, and their moderation.
//!
//! A user holds at most one evaluation per game. Ratings count immediately;
//! review text goes through the moderation gate before it becomes publicly
//! visible. Editing an evaluation resets its moderation state.

use axum::extract::{Path, State};
use axum::Json;
use playscore_core::error::CoreError;
use playscore_core::game_status::STATUS_PUBLISHED;
use playscore_core::moderation::ModerationAction;
use playscore_core::rating;
use playscore_core::roles::ROLE_ADMIN;
use playscore_core::types::DbId;
use playscore_db::models::comment::FlagRequest;
use playscore_db::models::evaluation::{CreateEvaluation, Evaluation, UpdateEvaluation};
use playscore_db::repositories::{EvaluationRepo, GameRepo};
use playscore_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "evaluation",
        id,
    })
}

/// Notify admins when review text enters the moderation queue.
fn publish_reviewed(state: &AppState, actor: DbId, evaluation: &Evaluation, game_title: &str) {
    state.event_bus.publish(
        PlatformEvent::new("evaluation.reviewed")
            .with_source("evaluation", evaluation.id)
            .with_actor(actor)
            .with_payload(serde_json::json!({
                "title": game_title,
                "url": "/admin/moderation/evaluations",
            })),
    );
}

/// POST /api/v1/games/{game_id}/evaluations
///
/// Creates the caller's evaluation of a published game (unpublished games
/// are reported as not found). A second evaluation of the same game is
/// rejected with a 409.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_id): Path<DbId>,
    Json(body): Json<CreateEvaluation>,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    rating::validate_rating(body.rating).map_err(AppError::Core)?;
    let review = body.review.as_deref().map(str::trim).filter(|r| !r.is_empty());
    rating::validate_review(review).map_err(AppError::Core)?;

    let game = GameRepo::find_by_id(&state.pool, game_id)
        .await?
        .filter(|g| g.status == STATUS_PUBLISHED)
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "game",
            id: game_id,
        }))?;

    let evaluation =
        EvaluationRepo::create(&state.pool, game_id, user.user_id, body.rating, review).await?;

    if evaluation.review.is_some() {
        publish_reviewed(&state, user.user_id, &evaluation, &game.title);
    }

    Ok(Json(DataResponse::new(evaluation)))
}

/// PATCH /api/v1/evaluations/{id}
///
/// Owner-only edit of rating and/or review. The edit resets moderation
/// flags so changed text is re-reviewed.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateEvaluation>,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    if let Some(r) = body.rating {
        rating::validate_rating(r).map_err(AppError::Core)?;
    }
    let review = body.review.as_deref().map(str::trim).filter(|r| !r.is_empty());
    rating::validate_review(review).map_err(AppError::Core)?;

    let existing = EvaluationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if existing.user_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this evaluation".into(),
        )));
    }

    let evaluation = EvaluationRepo::update(&state.pool, id, body.rating, review)
        .await?
        .ok_or_else(|| not_found(id))?;

    if evaluation.review.is_some() {
        let game_title = GameRepo::find_by_id(&state.pool, evaluation.game_id)
            .await?
            .map(|g| g.title)
            .unwrap_or_default();
        publish_reviewed(&state, user.user_id, &evaluation, &game_title);
    }

    Ok(Json(DataResponse::new(evaluation)))
}

/// GET /api/v1/games/{game_id}/evaluations
///
/// Public listing hides unapproved review text (rating-only rows always
/// show); admins see everything.
pub async fn list_for_game(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(game_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Evaluation>>>> {
    let approved_only = !user.map(|u| u.role == ROLE_ADMIN).unwrap_or(false);
    let evaluations = EvaluationRepo::list_for_game(&state.pool, game_id, approved_only).await?;
    Ok(Json(DataResponse::new(evaluations)))
}

/// DELETE /api/v1/evaluations/{id}
///
/// The author or an admin can soft-delete an evaluation.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let evaluation = EvaluationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if evaluation.user_id != user.user_id && user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this evaluation".into(),
        )));
    }

    EvaluationRepo::soft_delete(&state.pool, id).await?;
    Ok(Json(DataResponse::new(serde_json::json!({ "deleted": true }))))
}

/// POST /api/v1/admin/evaluations/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    moderate(&state, admin.user_id, id, ModerationAction::Approve).await
}

/// POST /api/v1/admin/evaluations/{id}/flag
pub async fn flag(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(body): Json<FlagRequest>,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    moderate(
        &state,
        admin.user_id,
        id,
        ModerationAction::Flag { reason: body.reason },
    )
    .await
}

/// POST /api/v1/admin/evaluations/bulk-approve
///
/// Approves every unflagged, unapproved evaluation carrying review text.
/// Running it twice is safe: the second run matches nothing.
pub async fn bulk_approve(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let approved = EvaluationRepo::bulk_approve_reviewed(&state.pool).await?;
    tracing::info!(approved, "bulk approved evaluations");
    Ok(Json(DataResponse::new(
        serde_json::json!({ "approved": approved }),
    )))
}

async fn moderate(
    state: &AppState,
    admin_id: DbId,
    id: DbId,
    action: ModerationAction,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    let outcome = action.resolve().map_err(AppError::Core)?;
    let reason = action.flag_reason();

    let evaluation = EvaluationRepo::moderate(&state.pool, id, outcome, reason)
        .await?
        .ok_or_else(|| not_found(id))?;

    let game_title = GameRepo::find_by_id(&state.pool, evaluation.game_id)
        .await?
        .map(|g| g.title)
        .unwrap_or_default();

    let (event_type, payload) = match &action {
        ModerationAction::Approve => (
            "evaluation.approved",
            serde_json::json!({
                "owner_user_id": evaluation.user_id,
                "title": game_title,
                "url": format!("/games/{}", evaluation.game_id),
            }),
        ),
        ModerationAction::Flag { reason } => (
            "evaluation.flagged",
            serde_json::json!({
                "owner_user_id": evaluation.user_id,
                "title": game_title,
                "reason": reason,
                "url": "/my/evaluations",
            }),
        ),
    };

    state.event_bus.publish(
        PlatformEvent::new(event_type)
            .with_source("evaluation", evaluation.id)
            .with_actor(admin_id)
            .with_payload(payload),
    );

    Ok(Json(DataResponse::new(evaluation)))
}
