//! Admin maintenance handlers mirroring the offline maintenance binary.

use axum::extract::{Path, Query, State};
use axum::Json;
use playscore_core::error::CoreError;
use playscore_core::roles::{ROLE_ADMIN, ROLE_PLAYER};
use playscore_db::models::event::EventRecord;
use playscore_db::models::user::IntegrityFinding;
use playscore_db::repositories::{EventRepo, RoleRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users/integrity
///
/// Reports accounts with missing roles, blank display names, or orphaned
/// soft-delete markers. Read-only.
pub async fn integrity_check(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<IntegrityFinding>>>> {
    let findings = UserRepo::integrity_scan(&state.pool).await?;
    Ok(Json(DataResponse::new(findings)))
}

/// POST /api/v1/admin/users/integrity/fix
///
/// Repairs what the integrity scan reports: assigns the default role where
/// missing and normalizes inconsistent soft-delete state.
pub async fn integrity_fix(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let fixed = UserRepo::integrity_fix(&state.pool, ROLE_PLAYER).await?;
    tracing::info!(fixed, "user integrity repairs applied");
    Ok(Json(DataResponse::new(serde_json::json!({ "fixed": fixed }))))
}

/// POST /api/v1/admin/users/{email}/restore
///
/// Restores a soft-deleted account back to active. Refuses accounts that
/// are not currently deleted.
pub async fn restore_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(email): Path<String>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let restored = UserRepo::restore(&state.pool, &email).await?;
    if !restored {
        return Err(AppError::Core(CoreError::Conflict(
            "No deleted account with that email".into(),
        )));
    }
    tracing::info!(%email, "account restored");
    Ok(Json(DataResponse::new(serde_json::json!({ "restored": true }))))
}

/// POST /api/v1/admin/users/{email}/verify-email
///
/// Stamps `email_verified_at` for an admin account that cannot receive the
/// verification mail. One-shot: already-verified accounts 409.
pub async fn verify_admin_email(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(email): Path<String>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::BadRequest("No account with that email".into()))?;

    let roles = RoleRepo::names_for_user(&state.pool, user.id).await?;
    if !roles.iter().any(|r| r == ROLE_ADMIN) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only admin accounts can be verified this way".into(),
        )));
    }

    let stamped = UserRepo::mark_email_verified(&state.pool, &email).await?;
    if !stamped {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already verified".into(),
        )));
    }
    tracing::info!(%email, "admin email verified");
    Ok(Json(DataResponse::new(serde_json::json!({ "verified": true }))))
}

#[derive(Debug, Deserialize)]
pub struct EventLogQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/admin/events
///
/// Most recent platform events, newest first. Useful for auditing the
/// notification pipeline.
pub async fn recent_events(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(q): Query<EventLogQuery>,
) -> AppResult<Json<DataResponse<Vec<EventRecord>>>> {
    let limit = q.limit.unwrap_or(100).clamp(1, 500);
    let events = EventRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse::new(events)))
}
