//! Role-gated resource routes.

use axum::http::StatusCode;
use serde_json::json;
use vantage_core::Status;

use crate::common::TestApp;

fn startup(founder_uid: &str) -> serde_json::Value {
    json!({
        "name": "Acme Robotics",
        "description": "Warehouse robots",
        "website": "https://acme.example.com",
        "founder_uid": founder_uid,
    })
}

#[tokio::test]
async fn test_investor_and_admin_list_startups() {
    let app = TestApp::seeded().await;
    app.put_document("startups", "s1", json!({"name": "Seeded", "founder_uid": "founder-user-01"}))
        .await;

    for uid in ["investor-user-01", "admin-user-01"] {
        let response = app.get("/api/startups", Some(&app.token(uid))).await;
        assert_eq!(response.status, StatusCode::OK, "{uid}");
        let startups = response.body.as_array().unwrap();
        assert_eq!(startups.len(), 1);
        assert_eq!(startups[0]["id"], "s1");
        assert_eq!(startups[0]["name"], "Seeded");
    }
}

#[tokio::test]
async fn test_founder_cannot_list_startups() {
    let app = TestApp::seeded().await;
    let response = app
        .get("/api/startups", Some(&app.token("founder-user-01")))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.category(), "authorization");
    assert_eq!(
        response.detail(),
        "You do not have permission to access this resource."
    );
}

#[tokio::test]
async fn test_inactive_accounts_are_403() {
    let app = TestApp::seeded().await;

    let pending = app
        .get("/api/startups", Some(&app.token("investor-user-02")))
        .await;
    assert_eq!(pending.status, StatusCode::FORBIDDEN);
    assert_eq!(pending.detail(), "User account is not active.");

    let inactive = app
        .get("/api/founder/dashboard", Some(&app.token("founder-user-02")))
        .await;
    assert_eq!(inactive.status, StatusCode::FORBIDDEN);
    assert_eq!(inactive.detail(), "User account is not active.");
}

#[tokio::test]
async fn test_account_without_profile_is_403() {
    let app = TestApp::new();
    let uid = app.account("stranger@example.com").await;

    let response = app.get("/api/startups", Some(&app.token(&uid))).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.detail(), "User profile not found in database.");
}

#[tokio::test]
async fn test_guard_sees_profile_changes_immediately() {
    let app = TestApp::seeded().await;
    let token = app.token("investor-user-01");
    assert_eq!(
        app.get("/api/startups", Some(&token)).await.status,
        StatusCode::OK
    );

    let mut profile = app.profile("investor-user-01").await.unwrap();
    profile.status = Some(Status::Inactive);
    app.put_profile(&profile).await;

    assert_eq!(
        app.get("/api/startups", Some(&token)).await.status,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_founder_submits_startup() {
    let app = TestApp::seeded().await;
    let founder = app.token("founder-user-01");

    let created = app
        .post("/api/startups", Some(&founder), startup("founder-user-01"))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_str().unwrap().to_string();
    assert_eq!(created.body["name"], "Acme Robotics");
    assert_eq!(created.body["founder_uid"], "founder-user-01");

    let fetched = app
        .get(&format!("/api/startups/{id}"), Some(&app.token("investor-user-01")))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["id"], id.as_str());
    assert_eq!(fetched.body["website"], "https://acme.example.com");
}

#[tokio::test]
async fn test_founder_cannot_submit_for_someone_else() {
    let app = TestApp::seeded().await;
    let response = app
        .post(
            "/api/startups",
            Some(&app.token("founder-user-01")),
            startup("founder-user-02"),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.detail(),
        "You can only submit a startup for your own account."
    );
}

#[tokio::test]
async fn test_investor_cannot_submit_startup() {
    let app = TestApp::seeded().await;
    let response = app
        .post(
            "/api/startups",
            Some(&app.token("investor-user-01")),
            startup("investor-user-01"),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_startup_is_404() {
    let app = TestApp::seeded().await;
    let response = app
        .get("/api/startups/missing", Some(&app.token("admin-user-01")))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.category(), "not_found");
    assert_eq!(response.detail(), "Startup not found.");
}

#[tokio::test]
async fn test_founder_dashboard() {
    let app = TestApp::seeded().await;
    let founder = app.token("founder-user-01");

    let empty = app.get("/api/founder/dashboard", Some(&founder)).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert!(empty.body["startup"].is_null());
    assert_eq!(empty.body["memos"], json!([]));
    assert_eq!(empty.body["investor_interest"], json!([]));

    app.post("/api/startups", Some(&founder), startup("founder-user-01"))
        .await;
    let dashboard = app.get("/api/founder/dashboard", Some(&founder)).await;
    assert_eq!(dashboard.body["startup"]["name"], "Acme Robotics");
    assert!(dashboard.body["startup"]["id"].is_string());

    let investor = app
        .get("/api/founder/dashboard", Some(&app.token("investor-user-01")))
        .await;
    assert_eq!(investor.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_memos() {
    let app = TestApp::seeded().await;
    app.put_document("memos", "m1", json!({"title": "Series A memo"}))
        .await;

    for uid in ["investor-user-01", "admin-user-01"] {
        let memo = app.get("/api/memos/m1", Some(&app.token(uid))).await;
        assert_eq!(memo.status, StatusCode::OK, "{uid}");
        assert_eq!(memo.body["id"], "m1");
        assert_eq!(memo.body["title"], "Series A memo");
    }

    let founder = app
        .get("/api/memos/m1", Some(&app.token("founder-user-01")))
        .await;
    assert_eq!(founder.status, StatusCode::FORBIDDEN);

    let missing = app
        .get("/api/memos/m2", Some(&app.token("investor-user-01")))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.detail(), "Memo not found.");
}

#[tokio::test]
async fn test_path_like_ids_do_not_escape_the_collection() {
    let app = TestApp::seeded().await;
    let investor = app.token("investor-user-01");

    let startup = app
        .get("/api/startups/..%2Fusers%2Fadmin-user-01", Some(&investor))
        .await;
    assert_eq!(startup.status, StatusCode::NOT_FOUND);
    assert_eq!(startup.detail(), "Startup not found.");
    assert!(startup.body.get("email").is_none());

    let memo = app
        .get("/api/memos/..%2Fusers%2Fadmin-user-01", Some(&investor))
        .await;
    assert_eq!(memo.status, StatusCode::NOT_FOUND);
    assert_eq!(memo.detail(), "Memo not found.");

    let reserved = app
        .get("/api/startups/__name__", Some(&investor))
        .await;
    assert_eq!(reserved.status, StatusCode::NOT_FOUND);
}
