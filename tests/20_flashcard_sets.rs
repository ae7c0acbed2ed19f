mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use common::{set_id, TestApp};

fn last_updated(set: &Value) -> DateTime<Utc> {
    set["last_updated"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn create_set_presets_card_count() {
    let app = TestApp::new();
    let token = app.user("alice").await;

    let set = app.create_set(&token, "Biology", "private", 3).await;
    assert_eq!(set["title"], "Biology");
    assert_eq!(set["visibility"], "private");
    assert_eq!(set["username"], "alice");
    assert_eq!(set["num_cards"], 3);
    assert_eq!(set["flashcards"]["count"], 3);
    assert_eq!(set["flashcards"]["cards"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn create_set_accepts_short_visibility_tokens_and_no_cards() {
    let app = TestApp::new();
    let token = app.user("alice").await;

    let (status, set) = app
        .post("/flashcards", &token, json!({ "title": "Chem", "permissions": "pub" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(set["visibility"], "public");
    assert_eq!(set["num_cards"], 0);
}

#[tokio::test]
async fn create_set_validates_before_writing() {
    let app = TestApp::new();
    let token = app.user("alice").await;

    let long_title = "t".repeat(101);
    for body in [
        json!({ "title": long_title, "visibility": "public" }),
        json!({ "title": "  ", "visibility": "public" }),
        json!({ "title": "Ok", "visibility": "friends" }),
        json!({ "title": "Ok", "visibility": "public", "flashcards": [{ "term": "", "definition": "x" }] }),
        json!({ "title": "Ok", "visibility": "public", "flashcards": [{ "term": "x", "definition": "d".repeat(2001) }] }),
    ] {
        let (status, _) = app.post("/flashcards", &token, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, mine) = app.get("/users/me/flashcards", &token).await;
    assert_eq!(mine["count"], 0);
}

#[tokio::test]
async fn private_set_is_invisible_to_other_users() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let set = app.create_set(&alice, "Secret", "private", 2).await;
    let id = set_id(&set);

    let (status, body) = app.get(&format!("/flashcards/{}", id), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flashcards"]["count"], 2);

    let (status, hidden) = app.get(&format!("/flashcards/{}", id), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, missing) = app.get("/flashcards/999999", &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        hidden["Error"].as_str().unwrap().replace(&id.to_string(), "ID"),
        missing["Error"].as_str().unwrap().replace("999999", "ID")
    );
}

#[tokio::test]
async fn public_set_is_readable_but_not_writable_by_others() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let set = app.create_set(&alice, "Shared", "public", 1).await;
    let uri = format!("/flashcards/{}", set_id(&set));

    let (status, body) = app.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Shared");

    let (status, body) = app.patch(&uri, &bob, json!({ "title": "Mine now" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app.delete(&uri, &bob).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.post(&uri, &bob, json!({ "term": "t", "definition": "d" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_set_ids_are_invalid_targets() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    for raw in ["abc", "0", "-1", "1.5"] {
        let (status, body) = app.get(&format!("/flashcards/{}", raw), &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
        assert_eq!(body["code"], "INVALID_TARGET");
    }
}

#[tokio::test]
async fn owner_edits_title_and_visibility() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    let set = app.create_set(&token, "Draft", "private", 0).await;
    let uri = format!("/flashcards/{}", set_id(&set));

    let (status, _) = app.patch(&uri, &token, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .patch(&uri, &token, json!({ "title": "t".repeat(101), "visibility": "public" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = app
        .patch(&uri, &token, json!({ "title": "Final", "visibility": "public" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["visibility"], "public");
    assert!(last_updated(&updated) > last_updated(&set));
}

#[tokio::test]
async fn delete_set_cascades() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    let set = app.create_set(&token, "Temp", "private", 2).await;
    let id = set_id(&set);
    let card_id = set["flashcards"]["cards"][0]["flashcard_id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("/flashcards/{}", id), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.get(&format!("/flashcards/{}", id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/flashcards/{}/{}", id, card_id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_profile_lists_only_public_sets() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    app.create_set(&alice, "Open", "public", 0).await;
    app.create_set(&alice, "Closed", "private", 0).await;

    let (_, me) = app.get("/users/me", &alice).await;
    let alice_id = me["user_id"].as_i64().unwrap();

    let (status, profile) = app.get(&format!("/users/{}", alice_id), &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["user"]["username"], "alice");
    assert!(profile["user"].get("email").is_none());
    assert_eq!(profile["count"], 1);
    assert_eq!(common::titles(&profile), vec!["Open"]);

    let (status, _) = app.get("/users/424242", &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get("/users/nobody", &bob).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
