//! HTTP-level integration tests for the game submission lifecycle.

mod common;

use axum::http::StatusCode;
use common::{
    assert_status, delete_auth, get, get_auth, post_auth, post_json_auth, token_for,
};
use playscore_core::roles::{ROLE_ADMIN, ROLE_DEVELOPER, ROLE_PLAYER};
use sqlx::PgPool;

async fn create_draft(pool: &PgPool, token: &str, title: &str) -> i64 {
    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/games",
            token,
            serde_json::json!({ "title": title }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["status"], "draft");
    json["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn lifecycle_draft_submit_approve_publish(pool: PgPool) {
    let dev = common::create_test_user(&pool, "dev@test.com", ROLE_DEVELOPER).await;
    let admin = common::create_test_user(&pool, "admin@test.com", ROLE_ADMIN).await;
    let dev_token = token_for(dev.id, ROLE_DEVELOPER);
    let admin_token = token_for(admin.id, ROLE_ADMIN);

    let game_id = create_draft(&pool, &dev_token, "Starfall Odyssey").await;

    // Draft games are invisible to the public.
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{game_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Submit moves it into the pending queue.
    let json = assert_status(
        post_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/submit"),
            &dev_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["status"], "pending");

    let json = assert_status(
        get_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/admin/games/pending",
            &admin_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // Approval publishes it.
    let json = assert_status(
        post_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/admin/games/{game_id}/approve"),
            &admin_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["approved_by"], admin.id);

    // Now the public detail works and counts a view.
    let json = assert_status(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}"),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["slug"], "starfall-odyssey");

    let json = assert_status(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/games/{game_id}"),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["view_count"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn draft_cannot_be_approved_directly(pool: PgPool) {
    let dev = common::create_test_user(&pool, "dev@test.com", ROLE_DEVELOPER).await;
    let admin = common::create_test_user(&pool, "admin@test.com", ROLE_ADMIN).await;
    let dev_token = token_for(dev.id, ROLE_DEVELOPER);
    let admin_token = token_for(admin.id, ROLE_ADMIN);

    let game_id = create_draft(&pool, &dev_token, "Skipping Ahead").await;

    let response = post_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/games/{game_id}/approve"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_approval_loses_with_conflict(pool: PgPool) {
    let dev = common::create_test_user(&pool, "dev@test.com", ROLE_DEVELOPER).await;
    let admin = common::create_test_user(&pool, "admin@test.com", ROLE_ADMIN).await;
    let dev_token = token_for(dev.id, ROLE_DEVELOPER);
    let admin_token = token_for(admin.id, ROLE_ADMIN);

    let game_id = create_draft(&pool, &dev_token, "Race Condition").await;
    post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{game_id}/submit"),
        &dev_token,
    )
    .await;

    let first = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/games/{game_id}/approve"),
        &admin_token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/games/{game_id}/approve"),
        &admin_token,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reject_requires_feedback_then_resubmit_works(pool: PgPool) {
    let dev = common::create_test_user(&pool, "dev@test.com", ROLE_DEVELOPER).await;
    let admin = common::create_test_user(&pool, "admin@test.com", ROLE_ADMIN).await;
    let dev_token = token_for(dev.id, ROLE_DEVELOPER);
    let admin_token = token_for(admin.id, ROLE_ADMIN);

    let game_id = create_draft(&pool, &dev_token, "Needs Work").await;
    post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{game_id}/submit"),
        &dev_token,
    )
    .await;

    // Blank feedback is refused.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/games/{game_id}/reject"),
        &admin_token,
        serde_json::json!({ "feedback": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/admin/games/{game_id}/reject"),
            &admin_token,
            serde_json::json!({ "feedback": "Screenshots are missing" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["status"], "rejected");
    assert_eq!(json["data"]["rejection_feedback"], "Screenshots are missing");

    // Resubmission clears the feedback and returns to pending.
    let json = assert_status(
        post_auth(
            common::build_test_app(pool),
            &format!("/api/v1/games/{game_id}/resubmit"),
            &dev_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["status"], "pending");
    assert!(json["data"]["rejection_feedback"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_the_owner_can_submit(pool: PgPool) {
    let dev = common::create_test_user(&pool, "dev@test.com", ROLE_DEVELOPER).await;
    let other = common::create_test_user(&pool, "other@test.com", ROLE_DEVELOPER).await;
    let dev_token = token_for(dev.id, ROLE_DEVELOPER);
    let other_token = token_for(other.id, ROLE_DEVELOPER);

    let game_id = create_draft(&pool, &dev_token, "Mine Alone").await;

    let response = post_auth(
        common::build_test_app(pool),
        &format!("/api/v1/games/{game_id}/submit"),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn players_cannot_create_games(pool: PgPool) {
    let player = common::create_test_user(&pool, "player@test.com", ROLE_PLAYER).await;
    let token = token_for(player.id, ROLE_PLAYER);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/games",
        &token,
        serde_json::json!({ "title": "Nope" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn pending_games_cannot_be_edited(pool: PgPool) {
    let dev = common::create_test_user(&pool, "dev@test.com", ROLE_DEVELOPER).await;
    let dev_token = token_for(dev.id, ROLE_DEVELOPER);

    let game_id = create_draft(&pool, &dev_token, "Locked While Pending").await;
    post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{game_id}/submit"),
        &dev_token,
    )
    .await;

    let response = common::patch_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/games/{game_id}"),
        &dev_token,
        serde_json::json!({ "title": "Sneaky Edit" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn soft_deleted_game_disappears(pool: PgPool) {
    let dev = common::create_test_user(&pool, "dev@test.com", ROLE_DEVELOPER).await;
    let dev_token = token_for(dev.id, ROLE_DEVELOPER);

    let game_id = create_draft(&pool, &dev_token, "Short Lived").await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{game_id}"),
        &dev_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = assert_status(
        get_auth(
            common::build_test_app(pool),
            "/api/v1/my/games",
            &dev_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn csv_export_is_admin_only(pool: PgPool) {
    let admin = common::create_test_user(&pool, "admin@test.com", ROLE_ADMIN).await;
    let player = common::create_test_user(&pool, "player@test.com", ROLE_PLAYER).await;

    let forbidden = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/games/export",
        &token_for(player.id, ROLE_PLAYER),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/games/export",
        &token_for(admin.id, ROLE_ADMIN),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));
}
