//! HTTP-level tests driving the auth router directly with `oneshot`.

use std::sync::Arc;
use std::time::Duration;

use auth::domain::entity::user::User;
use auth::domain::value_object::{email::Email, user_id::UserId};
use auth::{
    AuthConfig, AuthResult, AuthService, InMemoryUserRepository, SigningSecret, UserRepository,
    auth_router,
};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use platform::password::{HashedPassword, HashingPolicy};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

fn test_config() -> AuthConfig {
    AuthConfig::new(SigningSecret::new(b"http-test-secret".to_vec())).with_hashing(
        HashingPolicy {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    )
}

fn build_app<R: UserRepository + Send + Sync + 'static>(repo: R, timeout: Duration) -> Router {
    let service = AuthService::new(Arc::new(repo), test_config()).unwrap();
    Router::new().nest("/api/auth", auth_router(service, timeout))
}

fn memory_app() -> Router {
    build_app(InMemoryUserRepository::new(), Duration::from_secs(10))
}

async fn post_json(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_json(app, uri, body.to_string()).await
}

struct StallingRepo;

impl UserRepository for StallingRepo {
    async fn find_by_email(&self, _: &Email, _: &CancellationToken) -> AuthResult<Option<User>> {
        std::future::pending().await
    }

    async fn save(&self, _: &Email, _: &HashedPassword, _: &CancellationToken) -> AuthResult<UserId> {
        std::future::pending().await
    }
}

struct FailingRepo;

impl UserRepository for FailingRepo {
    async fn find_by_email(&self, _: &Email, _: &CancellationToken) -> AuthResult<Option<User>> {
        Err(auth::AuthError::Storage("pq: relation users does not exist".to_string()))
    }

    async fn save(&self, _: &Email, _: &HashedPassword, _: &CancellationToken) -> AuthResult<UserId> {
        Err(auth::AuthError::Storage("pq: relation users does not exist".to_string()))
    }
}

// ============================================================================
// Register
// ============================================================================

#[tokio::test]
async fn test_register_returns_created() {
    let app = memory_app();
    let (status, body) = post(
        &app,
        "/api/auth/register",
        json!({ "email": "a@x.com", "password": "pw" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["userId"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = memory_app();
    let req = json!({ "email": "a@x.com", "password": "pw" });

    let (status, _) = post(&app, "/api/auth/register", req.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/api/auth/register", req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn test_register_requires_email() {
    let app = memory_app();
    let (status, body) = post(
        &app,
        "/api/auth/register",
        json!({ "email": "", "password": "pw" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "email is required");
}

#[tokio::test]
async fn test_register_requires_password() {
    let app = memory_app();
    let (status, body) = post(&app, "/api/auth/register", json!({ "email": "a@x.com" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "password is required");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_after_register() {
    let app = memory_app();
    let creds = json!({ "email": "a@x.com", "password": "pw" });

    let (status, _) = post(&app, "/api/auth/register", creds.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/api/auth/login", creds).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"].as_str().map(|t| t.split('.').count()), Some(3));
}

#[tokio::test]
async fn test_login_failures_share_response() {
    let app = memory_app();
    post(
        &app,
        "/api/auth/register",
        json!({ "email": "a@x.com", "password": "right" }),
    )
    .await;

    let (unknown_status, unknown_body) = post(
        &app,
        "/api/auth/login",
        json!({ "email": "nobody@x.com", "password": "right" }),
    )
    .await;
    let (wrong_status, wrong_body) = post(
        &app,
        "/api/auth/login",
        json!({ "email": "a@x.com", "password": "wrong" }),
    )
    .await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn test_login_requires_email() {
    let app = memory_app();
    let (status, body) = post(&app, "/api/auth/login", json!({ "password": "pw" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "email is required");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = memory_app();
    let (status, _) = post_json(&app, "/api/auth/login", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_storage_error_detail_is_hidden() {
    let app = build_app(FailingRepo, Duration::from_secs(10));
    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({ "email": "a@x.com", "password": "pw" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "internal error");
    assert!(!body.to_string().contains("relation users"));
}

#[tokio::test]
async fn test_request_timeout() {
    let app = build_app(StallingRepo, Duration::from_millis(50));
    let (status, _) = post(
        &app,
        "/api/auth/register",
        json!({ "email": "a@x.com", "password": "pw" }),
    )
    .await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}
