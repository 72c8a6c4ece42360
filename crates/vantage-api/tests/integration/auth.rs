//! Sign-up, sign-in and token handling over HTTP.

use axum::http::{header, StatusCode};
use serde_json::json;
use vantage_core::{Role, Status};

use crate::common::TestApp;

#[tokio::test]
async fn test_root_and_health_need_no_token() {
    let app = TestApp::new();

    let root = app.get("/", None).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(
        root.body["message"],
        "Welcome to the backend! API is running."
    );

    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");
}

#[tokio::test]
async fn test_sign_up_then_sign_in() {
    let app = TestApp::new();

    let signed_up = app
        .post(
            "/api/v1/auth/signup",
            None,
            json!({"email": "vc@example.com", "password": "s3cret", "role": "investor"}),
        )
        .await;
    assert_eq!(signed_up.status, StatusCode::CREATED);
    let uid = signed_up.body["uid"].as_str().unwrap().to_string();

    let profile = app.profile(&uid).await.unwrap();
    assert_eq!(profile.role, Some(Role::Consumer));
    assert_eq!(profile.status, Some(Status::Active));

    let token = app.token(&uid);
    let signed_in = app
        .post("/api/v1/auth/google-signin", Some(&token), json!({}))
        .await;
    assert_eq!(signed_in.status, StatusCode::OK);
    assert_eq!(signed_in.body["status"], "success");
    assert_eq!(signed_in.body["role"], "investor");
    assert_eq!(signed_in.body["created"], false);
    assert_eq!(
        signed_in.body["message"],
        format!("Custom claim 'investor' set for user {uid}")
    );
}

#[tokio::test]
async fn test_first_sign_in_provisions_founder() {
    let app = TestApp::new();
    let uid = app.account("google-user@example.com").await;
    let token = app.token(&uid);

    let signed_in = app
        .post("/api/v1/auth/signin", Some(&token), json!({}))
        .await;
    assert_eq!(signed_in.status, StatusCode::OK);
    assert_eq!(signed_in.body["role"], "founder");
    assert_eq!(signed_in.body["created"], true);

    let profile = app.profile(&uid).await.unwrap();
    assert_eq!(profile.role, Some(Role::Producer));
    assert_eq!(profile.email.as_deref(), Some("google-user@example.com"));
    assert_eq!(app.provider.custom_claims(&uid).unwrap()["role"], "founder");

    // A fresh token now carries the claim.
    let me = app.get("/api/me", Some(&app.token(&uid))).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["uid"], uid.as_str());
    assert_eq!(me.body["email"], "google-user@example.com");
}

#[tokio::test]
async fn test_sign_up_rejections() {
    let app = TestApp::new();

    let admin = app
        .post(
            "/api/v1/auth/signup",
            None,
            json!({"email": "a@example.com", "password": "pw", "role": "admin"}),
        )
        .await;
    assert_eq!(admin.status, StatusCode::BAD_REQUEST);
    assert_eq!(admin.category(), "validation");
    assert_eq!(
        admin.detail(),
        "Invalid role 'admin'. Choose 'founder' or 'investor'."
    );

    let empty = app
        .post(
            "/api/v1/auth/signup",
            None,
            json!({"email": "", "password": "pw", "role": "founder"}),
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let malformed = app
        .post("/api/v1/auth/signup", None, json!({"email": "a@example.com"}))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.category(), "validation");

    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn test_duplicate_sign_up_is_409() {
    let app = TestApp::new();
    let body = json!({"email": "dup@example.com", "password": "pw", "role": "founder"});

    let first = app.post("/api/v1/auth/signup", None, body.clone()).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.post("/api/v1/auth/signup", None, body).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.category(), "conflict");
    assert!(second.detail().contains("dup@example.com"));
}

#[tokio::test]
async fn test_missing_and_bad_tokens_are_401() {
    let app = TestApp::new();

    for path in ["/api/me", "/api/startups", "/api/founder/dashboard"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(response.category(), "authentication");
    }

    let bad = app
        .post("/api/v1/auth/google-signin", Some("not-a-token"), json!({}))
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert!(bad.detail().starts_with("invalid token"));
}

#[tokio::test]
async fn test_revoked_token_signs_in_but_cannot_use_api() {
    let app = TestApp::new();
    let uid = app.account("revoked@example.com").await;
    let token = app.provider.issue_token_at(&uid, 1_000).unwrap();
    app.provider.revoke_tokens_at(&uid, 2_000).unwrap();

    let signed_in = app
        .post("/api/v1/auth/google-signin", Some(&token), json!({}))
        .await;
    assert_eq!(signed_in.status, StatusCode::OK);

    let me = app.get("/api/me", Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.detail(), "token has been revoked");
}

#[tokio::test]
async fn test_disabled_account_cannot_use_api() {
    let app = TestApp::new();
    let uid = app.account("disabled@example.com").await;
    let token = app.token(&uid);
    app.provider.set_disabled(&uid, true).unwrap();

    let me = app.get("/api/me", Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.detail(), "user account is disabled");
}
