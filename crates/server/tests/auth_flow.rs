use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::json;
use tower::Service;

use models::user::Role;
use server::routes::{self, auth};
use service::auth::repository::memory::InMemoryUserStore;
use service::auth::{AuthService, TokenService};
use service::complaint::repository::memory::InMemoryComplaintStore;
use service::complaint::ComplaintService;
use service::notify::recording::RecordingNotifier;
use uuid::Uuid;

const TEST_SECRET: &str = "test-secret";

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn build_app() -> Router {
    let users = Arc::new(InMemoryUserStore::default());
    let complaints = Arc::new(InMemoryComplaintStore::default());
    let notifier = Arc::new(RecordingNotifier::new());
    let tokens = Arc::new(TokenService::new(TEST_SECRET, Duration::days(7)));
    let state = auth::ServerState {
        users: users.clone(),
        tokens: tokens.clone(),
        auth: Arc::new(AuthService::new(users, tokens)),
        complaints: Arc::new(ComplaintService::new(
            complaints,
            notifier,
            "admin@company.com".into(),
        )),
    };
    routes::build_router(cors(), state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn register_and_login_flow() -> anyhow::Result<()> {
    let mut app = build_app();

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let req = post_json(
        "/auth/register",
        json!({"name": "Tester", "email": email, "password": "S3curePass!"}),
    );
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["email"], email);
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("password_hash").is_none());
    assert!(body["data"]["token"].as_str().unwrap().len() > 20);

    let req = post_json("/auth/login", json!({"email": email, "password": "S3curePass!"}));
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get("set-cookie");
    assert!(cookie.is_some(), "login must set the auth cookie");
    assert!(cookie.unwrap().to_str()?.starts_with("auth_token="));
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());
    Ok(())
}

#[tokio::test]
async fn register_missing_fields_rejected() -> anyhow::Result<()> {
    let mut app = build_app();
    let resp = app.call(post_json("/auth/register", json!({"email": "a@b.com"}))).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Please provide name, email, and password");
    Ok(())
}

#[tokio::test]
async fn register_duplicate_email_rejected_with_400() -> anyhow::Result<()> {
    let mut app = build_app();
    let payload = json!({"name": "A", "email": "dup@example.com", "password": "S3curePass!"});
    let resp = app.call(post_json("/auth/register", payload.clone())).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.call(post_json("/auth/register", payload)).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "User already exists with this email");
    Ok(())
}

#[tokio::test]
async fn register_short_password_rejected() -> anyhow::Result<()> {
    let mut app = build_app();
    let resp = app
        .call(post_json(
            "/auth/register",
            json!({"name": "A", "email": "a@b.com", "password": "short"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn register_unknown_role_rejected() -> anyhow::Result<()> {
    let mut app = build_app();
    let resp = app
        .call(post_json(
            "/auth/register",
            json!({"name": "A", "email": "a@b.com", "password": "S3curePass!", "role": "root"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_wrong_password_unauthorized() -> anyhow::Result<()> {
    let mut app = build_app();
    let resp = app
        .call(post_json(
            "/auth/register",
            json!({"name": "A", "email": "a@b.com", "password": "StrongPass123"}),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp =
        app.call(post_json("/auth/login", json!({"email": "a@b.com", "password": "wrong"}))).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid email or password");

    // Unknown accounts produce the exact same response.
    let resp = app
        .call(post_json("/auth/login", json!({"email": "ghost@b.com", "password": "wrong"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid email or password");
    Ok(())
}

async fn register_and_get_token(app: &mut Router, email: &str, role: &str) -> String {
    let resp = app
        .call(post_json(
            "/auth/register",
            json!({"name": "Tester", "email": email, "password": "S3curePass!", "role": role}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn me_returns_current_user_via_header() -> anyhow::Result<()> {
    let mut app = build_app();
    let token = register_and_get_token(&mut app, "me@example.com", "admin").await;

    let req = Request::builder()
        .uri("/auth/me")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["user"]["email"], "me@example.com");
    assert_eq!(body["data"]["user"]["role"], "admin");
    Ok(())
}

#[tokio::test]
async fn me_accepts_the_cookie_fallback() -> anyhow::Result<()> {
    let mut app = build_app();
    let token = register_and_get_token(&mut app, "cookie@example.com", "user").await;

    let req = Request::builder()
        .uri("/auth/me")
        .header("Cookie", format!("other=1; auth_token={token}"))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn me_without_token_unauthorized() -> anyhow::Result<()> {
    let mut app = build_app();
    let resp = app.call(Request::builder().uri("/auth/me").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "No token provided");
    Ok(())
}

#[tokio::test]
async fn me_with_expired_token_unauthorized() -> anyhow::Result<()> {
    let mut app = build_app();
    // Signed with the right secret but already past its expiry.
    let stale = TokenService::new(TEST_SECRET, Duration::minutes(-10));
    let token = stale.issue(Uuid::new_v4(), "a@b.com", Role::User)?;

    let req = Request::builder()
        .uri("/auth/me")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid token");
    Ok(())
}

#[tokio::test]
async fn me_with_foreign_signature_unauthorized() -> anyhow::Result<()> {
    let mut app = build_app();
    let foreign = TokenService::new("other-secret", Duration::days(7));
    let token = foreign.issue(Uuid::new_v4(), "a@b.com", Role::Admin)?;

    let req = Request::builder()
        .uri("/auth/me")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_for_deleted_user_is_rejected() -> anyhow::Result<()> {
    let mut app = build_app();
    // Valid signature, but the subject never existed in the store.
    let tokens = TokenService::new(TEST_SECRET, Duration::days(7));
    let token = tokens.issue(Uuid::new_v4(), "ghost@example.com", Role::Admin)?;

    let req = Request::builder()
        .uri("/auth/me")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "User not found");
    Ok(())
}
