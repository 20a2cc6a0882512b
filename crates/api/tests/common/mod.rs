//! Shared helpers for HTTP-level integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use playscore_api::auth::jwt::JwtConfig;
use playscore_api::auth::password::hash_password;
use playscore_api::config::ServerConfig;
use playscore_api::router::build_app_router;
use playscore_api::state::AppState;
use playscore_catalog::{CatalogService, RawgClient, RawgConfig};
use playscore_core::types::DbId;
use playscore_db::models::user::CreateUser;
use playscore_db::repositories::{RoleRepo, UserRepo};
use playscore_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. The catalog client points at an
/// unroutable address so catalog tests exercise the degraded path without
/// reaching the real upstream.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let catalog = Arc::new(CatalogService::new(RawgClient::new(RawgConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: String::new(),
    })));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        catalog,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// User and token helpers
// ---------------------------------------------------------------------------

/// Plaintext password used by every test user.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Create a user directly in the database with the given role and return it.
pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    role: &str,
) -> playscore_db::models::user::User {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hashed,
        },
    )
    .await
    .expect("user creation should succeed");

    let role_row = RoleRepo::find_by_name(pool, role)
        .await
        .expect("role lookup should succeed")
        .expect("role should be seeded");
    RoleRepo::assign(pool, user.id, role_row.id)
        .await
        .expect("role assignment should succeed");

    user
}

/// Mint an access token for a user without going through the login endpoint.
pub fn token_for(user_id: DbId, role: &str) -> String {
    playscore_api::auth::jwt::generate_access_token(user_id, role, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request with no body.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should not fail")
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should not fail")
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should not fail")
}

/// Send an authenticated POST request with a JSON body.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should not fail")
}

/// Send an authenticated POST request with no body.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    post_json_auth(app, uri, token, serde_json::json!({})).await
}

/// Send an authenticated PATCH request with a JSON body.
pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("PATCH")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should not fail")
}

/// Send an authenticated DELETE request.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should not fail")
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert a response status, printing the body on mismatch.
pub async fn assert_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected, "unexpected status; body: {json}");
    json
}
