//! Repository-level tests for the comment/evaluation moderation gate.

use playscore_core::moderation::ModerationAction;
use playscore_db::models::game::CreateGame;
use playscore_db::models::user::CreateUser;
use playscore_db::repositories::{CommentRepo, EvaluationRepo, GameRepo, UserRepo};
use sqlx::PgPool;

async fn seed_game(pool: &PgPool) -> (i64, i64) {
    let dev = UserRepo::create(
        pool,
        &CreateUser {
            email: "dev@example.com".to_string(),
            display_name: "Dev".to_string(),
            password_hash: "$argon2id$test".to_string(),
        },
    )
    .await
    .unwrap()
    .id;
    let game = GameRepo::create(
        pool,
        dev,
        "starfall",
        &CreateGame {
            title: "Starfall".to_string(),
            description: None,
            release_date: None,
            cover_url: None,
        },
    )
    .await
    .unwrap();
    (dev, game.id)
}

#[sqlx::test]
async fn test_new_comment_defaults_unapproved_unflagged(pool: PgPool) {
    let (user, game) = seed_game(&pool).await;
    let comment = CommentRepo::create(&pool, game, user, None, "first!").await.unwrap();

    assert!(!comment.is_approved);
    assert!(!comment.is_flagged);
    assert!(comment.flag_reason.is_none());
}

#[sqlx::test]
async fn test_approve_then_flag_never_both(pool: PgPool) {
    let (user, game) = seed_game(&pool).await;
    let comment = CommentRepo::create(&pool, game, user, None, "spammy link").await.unwrap();

    let outcome = ModerationAction::Approve.resolve().unwrap();
    let approved = CommentRepo::moderate(&pool, comment.id, outcome, None)
        .await
        .unwrap()
        .unwrap();
    assert!(approved.is_approved && !approved.is_flagged);

    let action = ModerationAction::Flag {
        reason: "spam".to_string(),
    };
    let outcome = action.resolve().unwrap();
    let flagged = CommentRepo::moderate(&pool, comment.id, outcome, action.flag_reason())
        .await
        .unwrap()
        .unwrap();
    assert!(flagged.is_flagged && !flagged.is_approved);
    assert_eq!(flagged.flag_reason.as_deref(), Some("spam"));
}

#[sqlx::test]
async fn test_evaluation_unique_per_user_game(pool: PgPool) {
    let (user, game) = seed_game(&pool).await;

    EvaluationRepo::create(&pool, game, user, 4, Some("tight controls"))
        .await
        .unwrap();

    let dup = EvaluationRepo::create(&pool, game, user, 5, None).await;
    let err = dup.expect_err("second evaluation for the same pair must fail");
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_evaluations_user_game"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test]
async fn test_bulk_approve_reviewed_is_idempotent(pool: PgPool) {
    let (user, game) = seed_game(&pool).await;
    let reviewer = UserRepo::create(
        &pool,
        &playscore_db::models::user::CreateUser {
            email: "player@example.com".to_string(),
            display_name: "Player".to_string(),
            password_hash: "$argon2id$test".to_string(),
        },
    )
    .await
    .unwrap()
    .id;

    // One evaluation with a review, one rating-only.
    EvaluationRepo::create(&pool, game, user, 4, Some("good")).await.unwrap();
    EvaluationRepo::create(&pool, game, reviewer, 3, None).await.unwrap();

    let first = EvaluationRepo::bulk_approve_reviewed(&pool).await.unwrap();
    assert_eq!(first, 1, "only the reviewed evaluation is approved");

    let second = EvaluationRepo::bulk_approve_reviewed(&pool).await.unwrap();
    assert_eq!(second, 0, "second run must be a no-op");
}

#[sqlx::test]
async fn test_bulk_approve_skips_flagged(pool: PgPool) {
    let (user, game) = seed_game(&pool).await;
    let eval = EvaluationRepo::create(&pool, game, user, 1, Some("offensive text"))
        .await
        .unwrap();

    let action = ModerationAction::Flag {
        reason: "abuse".to_string(),
    };
    EvaluationRepo::moderate(&pool, eval.id, action.resolve().unwrap(), action.flag_reason())
        .await
        .unwrap();

    let approved = EvaluationRepo::bulk_approve_reviewed(&pool).await.unwrap();
    assert_eq!(approved, 0, "flagged evaluations stay out of the bulk path");
}

#[sqlx::test]
async fn test_editing_evaluation_resets_moderation(pool: PgPool) {
    let (user, game) = seed_game(&pool).await;
    let eval = EvaluationRepo::create(&pool, game, user, 4, Some("v1")).await.unwrap();

    EvaluationRepo::moderate(
        &pool,
        eval.id,
        ModerationAction::Approve.resolve().unwrap(),
        None,
    )
    .await
    .unwrap();

    let updated = EvaluationRepo::update(&pool, eval.id, Some(2), Some("v2, much worse"))
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.is_approved, "edited text goes back through the gate");
    assert_eq!(updated.rating, 2);
}

#[sqlx::test]
async fn test_public_listing_excludes_unapproved_comments(pool: PgPool) {
    let (user, game) = seed_game(&pool).await;
    let c1 = CommentRepo::create(&pool, game, user, None, "visible soon").await.unwrap();
    CommentRepo::create(&pool, game, user, None, "still hidden").await.unwrap();

    CommentRepo::moderate(
        &pool,
        c1.id,
        ModerationAction::Approve.resolve().unwrap(),
        None,
    )
    .await
    .unwrap();

    let public = CommentRepo::list_for_game(&pool, game, true).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].id, c1.id);

    let all = CommentRepo::list_for_game(&pool, game, false).await.unwrap();
    assert_eq!(all.len(), 2);
}
