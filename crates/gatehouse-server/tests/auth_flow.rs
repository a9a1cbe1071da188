//! End-to-end login and bearer authentication through the real router.
//!
//! Run with: cargo test --package gatehouse-server --test auth_flow

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{Duration, Utc};
use gatehouse_server::{
    auth::{Argon2Verifier, InMemoryCredentialStore, bootstrap::seed_admin},
    config::AppConfig,
    router,
    state::AppState,
};
use gatehouse_token::{ClaimSet, SymmetricKey, TokenCodec};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app(expose_error_details: bool) -> (Router, Arc<AppState>) {
    let store = InMemoryCredentialStore::new();
    seed_admin(&store, "admin@example.com", "1", "password")
        .await
        .unwrap();

    let mut cfg = AppConfig::default();
    cfg.server.expose_error_details = expose_error_details;

    let state = Arc::new(
        AppState::new(
            cfg,
            SymmetricKey::generate(),
            Arc::new(store),
            Arc::new(Argon2Verifier),
        )
        .unwrap(),
    );
    (router(state.clone()), state)
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn login_token(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(login_request("admin@example.com", "password"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    body["token"].as_str().unwrap().to_string()
}

fn claims_in_window(not_before_offset: Duration, ttl: Duration) -> ClaimSet {
    let start = Utc::now() + not_before_offset;
    ClaimSet::builder()
        .subject("admin-auth")
        .audience("admin")
        .issuer("gatehouse")
        .unique_id("7d1f8f2e-52a8-4b55-9c55-3f0e3b0b2a11")
        .identity("1")
        .valid_for(start, ttl)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_healthz_needs_no_token() {
    let (app, _) = test_app(false).await;
    let resp = app.oneshot(get_with_auth("/healthz", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

/// Known user with the right password gets a token for their admin id.
#[tokio::test]
async fn test_login_issues_token_for_identity() {
    let (app, state) = test_app(false).await;

    let resp = app
        .oneshot(login_request("admin@example.com", "password"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["expires_at"].is_string());
    assert!(body.get("key").is_none());

    let token = body["token"].as_str().unwrap();
    assert!(token.starts_with("v4.local."));

    let claims = gatehouse_token::decode(token, state.issuer.key()).unwrap();
    assert_eq!(claims.identity(), "1");
    assert_eq!(claims.audience(), "admin");
    assert_eq!(claims.subject(), "admin-auth");
}

/// Wrong password and unknown user get the same 401 and no token.
#[tokio::test]
async fn test_bad_credentials_rejected_uniformly() {
    let (app, _) = test_app(false).await;

    let wrong = app
        .clone()
        .oneshot(login_request("admin@example.com", "nope"))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = body_string(wrong).await;
    assert_eq!(wrong_body, "invalid credentials");

    let unknown = app
        .oneshot(login_request("ghost@example.com", "password"))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(unknown).await, wrong_body);
}

/// A valid bearer token reaches the handler with the identity attached.
#[tokio::test]
async fn test_valid_bearer_token_forwarded() {
    let (app, _) = test_app(false).await;
    let token = login_token(&app).await;
    let bearer = format!("Bearer {token}");

    let resp = app
        .clone()
        .oneshot(get_with_auth("/protected", Some(&bearer)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_string(resp).await,
        "Protected resource accessed by admin ID: 1"
    );

    let resp = app
        .oneshot(get_with_auth("/whoami", Some(&bearer)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["identity"], "1");
    assert_eq!(body["issuer"], "gatehouse");
    assert!(body["unique_id"].as_str().is_some_and(|s| !s.is_empty()));
}

/// Anything that is not `Bearer <token>` is turned away before decoding.
#[tokio::test]
async fn test_malformed_header_rejected() {
    let (app, _) = test_app(false).await;
    let token = login_token(&app).await;

    for header_value in [
        None,
        Some(token.clone()),
        Some(format!("bearer {token}")),
        Some(format!("Token {token}")),
        Some(format!("Bearer{token}")),
    ] {
        let resp = app
            .clone()
            .oneshot(get_with_auth("/protected", header_value.as_deref()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{header_value:?}");
        assert_eq!(
            body_string(resp).await,
            "missing or malformed authorization header"
        );
    }
}

/// An authentic but expired token is rejected.
#[tokio::test]
async fn test_expired_token_rejected() {
    let (app, state) = test_app(false).await;
    let token = state
        .codec
        .encode(&claims_in_window(Duration::minutes(-10), Duration::minutes(5)))
        .unwrap();

    let resp = app
        .oneshot(get_with_auth("/protected", Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(resp).await, "invalid token");
}

/// With details exposed, the temporal cause is visible in the body.
#[tokio::test]
async fn test_error_details_name_the_temporal_failure() {
    let (app, state) = test_app(true).await;

    let expired = state
        .codec
        .encode(&claims_in_window(Duration::minutes(-10), Duration::minutes(5)))
        .unwrap();
    let resp = app
        .clone()
        .oneshot(get_with_auth("/protected", Some(&format!("Bearer {expired}"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_string(resp).await;
    assert!(body.starts_with("invalid token: "), "{body}");
    assert!(body.contains("validity_window"), "{body}");
    assert!(body.contains("expired"), "{body}");

    let early = state
        .codec
        .encode(&claims_in_window(Duration::minutes(10), Duration::minutes(5)))
        .unwrap();
    let resp = app
        .oneshot(get_with_auth("/protected", Some(&format!("Bearer {early}"))))
        .await
        .unwrap();
    assert!(body_string(resp).await.contains("not valid before"));
}

/// A token minted under a different key gets the generic 401.
#[tokio::test]
async fn test_foreign_key_token_rejected() {
    let (app, _) = test_app(false).await;
    let foreign = TokenCodec::new(Arc::new(SymmetricKey::generate()))
        .encode(&claims_in_window(Duration::zero(), Duration::minutes(5)))
        .unwrap();

    let resp = app
        .oneshot(get_with_auth("/protected", Some(&format!("Bearer {foreign}"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(resp).await, "invalid token");
}

/// Authentic tokens minted for another audience are refused.
#[tokio::test]
async fn test_wrong_audience_rejected() {
    let (app, state) = test_app(false).await;
    let claims = ClaimSet::builder()
        .subject("admin-auth")
        .audience("billing")
        .issuer("gatehouse")
        .unique_id("aud-test")
        .identity("1")
        .valid_for(Utc::now(), Duration::minutes(5))
        .build()
        .unwrap();
    let token = state.codec.encode(&claims).unwrap();

    let resp = app
        .oneshot(get_with_auth("/protected", Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_string(resp).await, "invalid token");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let (app, _) = test_app(false).await;

    for value in ["Bearer ", "Bearer not-a-token", "Bearer v4.local.AAAA"] {
        let resp = app
            .clone()
            .oneshot(get_with_auth("/whoami", Some(value)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{value}");
        assert_eq!(body_string(resp).await, "invalid token");
    }
}
