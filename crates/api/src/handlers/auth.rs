//! Authentication handlers: register, login, token refresh, logout.

use axum::extract::State;
use axum::Json;
use playscore_core::account_status;
use playscore_core::error::CoreError;
use playscore_core::roles::ROLE_PLAYER;
use playscore_db::models::user::{CreateUser, User};
use playscore_db::repositories::{RefreshTokenRepo, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt;
use crate::auth::password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user: User,
}

/// POST /api/v1/auth/register
///
/// Creates an account with the default `player` role.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<Json<DataResponse<User>>> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email address is required".into(),
        )));
    }
    if body.display_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Display name must not be empty".into(),
        )));
    }
    password::validate_password_strength(&body.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = password::hash_password(&body.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            display_name: body.display_name.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    let role = RoleRepo::find_by_name(&state.pool, ROLE_PLAYER)
        .await?
        .ok_or_else(|| AppError::InternalError("Default role is not seeded".into()))?;
    RoleRepo::assign(&state.pool, user.id, role.id).await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(Json(DataResponse::new(user)))
}

/// POST /api/v1/auth/login
///
/// Verifies credentials and the account status, then issues an access
/// token plus a refresh token. Suspended and deleted accounts cannot
/// authenticate; the error does not reveal which condition failed.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<TokenResponse>>> {
    let email = body.email.trim().to_lowercase();
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let verified = password::verify_password(&body.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    if !account_status::can_authenticate(&user.account_status) {
        return Err(AppError::Core(CoreError::Forbidden(
            "This account is not active".into(),
        )));
    }

    issue_tokens(&state, user).await.map(Json)
}

/// POST /api/v1/auth/refresh
///
/// Rotates the refresh token: the presented token is revoked and a fresh
/// access/refresh pair is issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<TokenResponse>>> {
    let hash = jwt::hash_refresh_token(&body.refresh_token);
    let stored = RefreshTokenRepo::find_live_by_hash(&state.pool, &hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, stored.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    if !account_status::can_authenticate(&user.account_status) {
        return Err(AppError::Core(CoreError::Forbidden(
            "This account is not active".into(),
        )));
    }

    RefreshTokenRepo::revoke(&state.pool, stored.id).await?;
    issue_tokens(&state, user).await.map(Json)
}

/// POST /api/v1/auth/logout
///
/// Revokes every live refresh token for the authenticated user.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let revoked = RefreshTokenRepo::revoke_all_for_user(&state.pool, user.user_id).await?;
    tracing::info!(user_id = user.user_id, revoked, "user logged out");
    Ok(Json(DataResponse::new(
        serde_json::json!({ "revoked": revoked }),
    )))
}

async fn issue_tokens(state: &AppState, user: User) -> AppResult<DataResponse<TokenResponse>> {
    let role = RoleRepo::primary_role(&state.pool, user.id)
        .await?
        .unwrap_or_else(|| ROLE_PLAYER.to_string());

    let access_token = jwt::generate_access_token(user.id, &role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    let (refresh_plain, refresh_hash) = jwt::generate_refresh_token();
    let expires_at = chrono::Utc::now()
        + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    RefreshTokenRepo::create(&state.pool, user.id, &refresh_hash, expires_at).await?;

    Ok(DataResponse::new(TokenResponse {
        access_token,
        refresh_token: refresh_plain,
        token_type: "Bearer",
        user,
    }))
}
