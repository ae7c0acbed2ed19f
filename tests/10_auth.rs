mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, PASSWORD};

#[tokio::test]
async fn health_endpoint_responds() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_returns_profile_without_credential() {
    let app = TestApp::new();
    let (status, body) = app.register("alice").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["user_id"].as_i64().unwrap() > 0);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_username_or_email_conflicts() {
    let app = TestApp::new();
    app.register("alice").await;

    let (status, body) = app.register("alice").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["Error"], "Username already exists");

    let other = json!({ "username": "alicia", "email": "alice@example.com", "password": PASSWORD });
    let (status, body) = app.request(Method::POST, "/users", None, Some(other)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["Error"], "Account with email already exists");
}

#[tokio::test]
async fn registration_policy_is_enforced() {
    let app = TestApp::new();
    for body in [
        json!({ "username": "al", "email": "al@example.com", "password": PASSWORD }),
        json!({ "username": "alice", "email": "not-an-email", "password": PASSWORD }),
        json!({ "username": "alice", "email": "alice@example.com", "password": "password" }),
        json!({ "username": "alice", "email": "alice@example.com" }),
    ] {
        let (status, response) = app.request(Method::POST, "/users", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["Error"].is_string());
        assert_eq!(response["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn login_outcomes() {
    let app = TestApp::new();
    app.register("alice").await;

    let (status, body) = app.login("nobody", PASSWORD).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let unknown_message = body["Error"].clone();

    let (status, body) = app.login("alice", "Wrong#123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["Error"], unknown_message);

    let (status, body) = app.login("alice", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert!(body["expiresAt"].is_string());
}

#[tokio::test]
async fn protected_routes_need_a_valid_bearer() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["Error"], "Token is not in header");

    let (status, body) = app.get("/users/me", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let (status, _) = app.get("/flashcards?name=", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_resolved_principal() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    let (status, body) = app.get("/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn profile_edits_are_validated_and_unique() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    app.register("bob").await;

    let (status, _) = app.patch("/users/me", &token, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // One bad field rejects the whole edit
    let (status, _) = app
        .patch("/users/me", &token, json!({ "username": "alice2", "email": "bad" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, me) = app.get("/users/me", &token).await;
    assert_eq!(me["username"], "alice");

    let (status, _) = app.patch("/users/me", &token, json!({ "username": "bob" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.patch("/users/me", &token, json!({ "username": "alice2" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice2");

    let (status, _) = app.login("alice2", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn password_change_requires_old_password() {
    let app = TestApp::new();
    let token = app.user("alice").await;

    let wrong = json!({ "old": "Wrong#123", "password": "Newpass#456" });
    let (status, _) = app.patch("/users/me/password", &token, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let weak = json!({ "old": PASSWORD, "password": "weak" });
    let (status, _) = app.patch("/users/me/password", &token, weak).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let good = json!({ "old": PASSWORD, "password": "Newpass#456" });
    let (status, body) = app.patch("/users/me/password", &token, good).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.login("alice", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.login("alice", "Newpass#456").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    let (status, body) = app
        .post("/flashcards", &token, json!({ "title": 5, "visibility": "public" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
