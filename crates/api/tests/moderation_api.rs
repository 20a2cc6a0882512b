//! HTTP-level integration tests for comment and evaluation moderation.

mod common;

use axum::http::StatusCode;
use common::{assert_status, get, post_auth, post_json_auth, token_for};
use playscore_core::roles::{ROLE_ADMIN, ROLE_DEVELOPER, ROLE_PLAYER};
use sqlx::PgPool;

/// Seed a published game and return its id.
async fn seed_published_game(pool: &PgPool) -> i64 {
    let dev = common::create_test_user(pool, "seed-dev@test.com", ROLE_DEVELOPER).await;
    let admin = common::create_test_user(pool, "seed-admin@test.com", ROLE_ADMIN).await;
    let dev_token = token_for(dev.id, ROLE_DEVELOPER);
    let admin_token = token_for(admin.id, ROLE_ADMIN);

    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/games",
            &dev_token,
            serde_json::json!({ "title": "Moderated Game" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let game_id = json["data"]["id"].as_i64().unwrap();

    post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{game_id}/submit"),
        &dev_token,
    )
    .await;
    post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/games/{game_id}/approve"),
        &admin_token,
    )
    .await;

    game_id
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unpublished_games_accept_no_comments_or_evaluations(pool: PgPool) {
    let dev = common::create_test_user(&pool, "seed-dev@test.com", ROLE_DEVELOPER).await;
    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/games",
            &token_for(dev.id, ROLE_DEVELOPER),
            serde_json::json!({ "title": "Unreleased Draft" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let draft_id = json["data"]["id"].as_i64().unwrap();

    let player = common::create_test_user(&pool, "player@test.com", ROLE_PLAYER).await;
    let token = token_for(player.id, ROLE_PLAYER);

    // The draft is invisible to everyone but its owner, so both endpoints
    // report it as missing rather than leaking its existence.
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{draft_id}/comments"),
        &token,
        serde_json::json!({ "content": "sneaky first comment" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{draft_id}/evaluations"),
        &token,
        serde_json::json!({ "rating": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // No rating slipped into the aggregate.
    let json = assert_status(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/games/{draft_id}/summary"),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["evaluation_count"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn comments_await_approval_before_becoming_public(pool: PgPool) {
    let game_id = seed_published_game(&pool).await;
    let player = common::create_test_user(&pool, "player@test.com", ROLE_PLAYER).await;
    let admin_token = token_for(
        common::create_test_user(&pool, "mod@test.com", ROLE_ADMIN).await.id,
        ROLE_ADMIN,
    );

    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/comments"),
            &token_for(player.id, ROLE_PLAYER),
            serde_json::json!({ "content": "Great pacing!" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let comment_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["is_approved"], false);

    // Anonymous listing hides the unapproved comment.
    let json = assert_status(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/comments"),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    // Approval makes it visible.
    let json = assert_status(
        post_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/admin/comments/{comment_id}/approve"),
            &admin_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["is_approved"], true);
    assert_eq!(json["data"]["is_flagged"], false);

    let json = assert_status(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/games/{game_id}/comments"),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn flagging_requires_a_reason_and_clears_approval(pool: PgPool) {
    let game_id = seed_published_game(&pool).await;
    let player = common::create_test_user(&pool, "player@test.com", ROLE_PLAYER).await;
    let admin_token = token_for(
        common::create_test_user(&pool, "mod@test.com", ROLE_ADMIN).await.id,
        ROLE_ADMIN,
    );

    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/comments"),
            &token_for(player.id, ROLE_PLAYER),
            serde_json::json!({ "content": "spam spam spam" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let comment_id = json["data"]["id"].as_i64().unwrap();

    // Approve first, then flag; the flags must never coexist.
    post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/comments/{comment_id}/approve"),
        &admin_token,
    )
    .await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/comments/{comment_id}/flag"),
        &admin_token,
        serde_json::json!({ "reason": "  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool),
            &format!("/api/v1/admin/comments/{comment_id}/flag"),
            &admin_token,
            serde_json::json!({ "reason": "Spam content" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["is_flagged"], true);
    assert_eq!(json["data"]["is_approved"], false);
    assert_eq!(json["data"]["flag_reason"], "Spam content");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn replies_are_limited_to_one_level(pool: PgPool) {
    let game_id = seed_published_game(&pool).await;
    let player = common::create_test_user(&pool, "player@test.com", ROLE_PLAYER).await;
    let token = token_for(player.id, ROLE_PLAYER);

    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/comments"),
            &token,
            serde_json::json!({ "content": "top level" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let top_id = json["data"]["id"].as_i64().unwrap();

    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/comments"),
            &token,
            serde_json::json!({ "content": "a reply", "parent_id": top_id }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let reply_id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/games/{game_id}/comments"),
        &token,
        serde_json::json!({ "content": "too deep", "parent_id": reply_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn one_evaluation_per_user_per_game(pool: PgPool) {
    let game_id = seed_published_game(&pool).await;
    let player = common::create_test_user(&pool, "player@test.com", ROLE_PLAYER).await;
    let token = token_for(player.id, ROLE_PLAYER);

    let first = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{game_id}/evaluations"),
        &token,
        serde_json::json!({ "rating": 4 }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/games/{game_id}/evaluations"),
        &token,
        serde_json::json!({ "rating": 5 }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn out_of_range_rating_is_rejected(pool: PgPool) {
    let game_id = seed_published_game(&pool).await;
    let player = common::create_test_user(&pool, "player@test.com", ROLE_PLAYER).await;
    let token = token_for(player.id, ROLE_PLAYER);

    for rating in [0, 6] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/evaluations"),
            &token,
            serde_json::json!({ "rating": rating }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bulk_approve_is_idempotent(pool: PgPool) {
    let game_id = seed_published_game(&pool).await;
    let admin_token = token_for(
        common::create_test_user(&pool, "mod@test.com", ROLE_ADMIN).await.id,
        ROLE_ADMIN,
    );

    let reviewer = common::create_test_user(&pool, "reviewer@test.com", ROLE_PLAYER).await;
    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{game_id}/evaluations"),
        &token_for(reviewer.id, ROLE_PLAYER),
        serde_json::json!({ "rating": 5, "review": "Masterpiece." }),
    )
    .await;

    // Rating-only evaluations never enter the moderation queue.
    let rater = common::create_test_user(&pool, "rater@test.com", ROLE_PLAYER).await;
    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/games/{game_id}/evaluations"),
        &token_for(rater.id, ROLE_PLAYER),
        serde_json::json!({ "rating": 3 }),
    )
    .await;

    let json = assert_status(
        post_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/admin/evaluations/bulk-approve",
            &admin_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["approved"], 1);

    let json = assert_status(
        post_auth(
            common::build_test_app(pool),
            "/api/v1/admin/evaluations/bulk-approve",
            &admin_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["approved"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn flagged_rating_only_evaluations_disappear_from_public_view(pool: PgPool) {
    let game_id = seed_published_game(&pool).await;
    let admin_token = token_for(
        common::create_test_user(&pool, "mod@test.com", ROLE_ADMIN).await.id,
        ROLE_ADMIN,
    );
    let rater = common::create_test_user(&pool, "rater@test.com", ROLE_PLAYER).await;

    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/evaluations"),
            &token_for(rater.id, ROLE_PLAYER),
            serde_json::json!({ "rating": 1 }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let eval_id = json["data"]["id"].as_i64().unwrap();

    // Rating-only rows count without moderation.
    let json = assert_status(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/evaluations"),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/evaluations/{eval_id}/flag"),
        &admin_token,
        serde_json::json!({ "reason": "Review bombing" }),
    )
    .await;

    // Flagging removes the row from the anonymous listing.
    let json = assert_status(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/games/{game_id}/evaluations"),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn editing_an_evaluation_resets_moderation(pool: PgPool) {
    let game_id = seed_published_game(&pool).await;
    let admin_token = token_for(
        common::create_test_user(&pool, "mod@test.com", ROLE_ADMIN).await.id,
        ROLE_ADMIN,
    );
    let player = common::create_test_user(&pool, "player@test.com", ROLE_PLAYER).await;
    let token = token_for(player.id, ROLE_PLAYER);

    let json = assert_status(
        post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/games/{game_id}/evaluations"),
            &token,
            serde_json::json!({ "rating": 4, "review": "Solid entry." }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let eval_id = json["data"]["id"].as_i64().unwrap();

    post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/evaluations/{eval_id}/approve"),
        &admin_token,
    )
    .await;

    let json = assert_status(
        common::patch_json_auth(
            common::build_test_app(pool),
            &format!("/api/v1/evaluations/{eval_id}"),
            &token,
            serde_json::json!({ "review": "Actually, even better on replay." }),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["is_approved"], false);
    assert_eq!(json["data"]["is_flagged"], false);
}
