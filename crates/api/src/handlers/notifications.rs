//! Notification inbox handlers for the authenticated user.

use axum::extract::{Path, Query, State};
use axum::Json;
use playscore_core::error::CoreError;
use playscore_core::types::DbId;
use playscore_db::models::notification::Notification;
use playscore_db::repositories::NotificationRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/notifications
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<ListNotificationsQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let limit = q.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = q.offset.unwrap_or(0).max(0);
    let notifications =
        NotificationRepo::list_for_user(&state.pool, user.user_id, q.unread, limit, offset).await?;
    Ok(Json(DataResponse::new(notifications)))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let count = NotificationRepo::unread_count(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(serde_json::json!({ "unread": count }))))
}

/// POST /api/v1/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let updated = NotificationRepo::mark_read(&state.pool, id, user.user_id).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "notification",
            id,
        }));
    }
    Ok(Json(DataResponse::new(serde_json::json!({ "read": true }))))
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let updated = NotificationRepo::mark_all_read(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse::new(serde_json::json!({ "read": updated }))))
}

/// DELETE /api/v1/notifications/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let deleted = NotificationRepo::delete(&state.pool, id, user.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "notification",
            id,
        }));
    }
    Ok(Json(DataResponse::new(serde_json::json!({ "deleted": true }))))
}
