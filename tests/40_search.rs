mod common;

use axum::http::StatusCode;

use common::{set_id, titles, TestApp};

#[tokio::test]
async fn my_sets_rank_exact_then_prefix_then_recency() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    for title in ["Intro to bio", "bio", "Biology 101", "Marine bio", "Chemistry"] {
        app.create_set(&token, title, "private", 0).await;
    }

    let (status, list) = app.get("/users/me/flashcards?name=bio", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&list), vec!["bio", "Biology 101", "Marine bio", "Intro to bio"]);
    assert_eq!(list["count"], 4);

    let (_, all) = app.get("/users/me/flashcards", &token).await;
    assert_eq!(
        titles(&all),
        vec!["Chemistry", "Marine bio", "Biology 101", "bio", "Intro to bio"]
    );
}

#[tokio::test]
async fn my_sets_only_lists_own_sets() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    app.create_set(&alice, "Alice deck", "public", 0).await;
    app.create_set(&bob, "Bob deck", "public", 0).await;

    let (_, list) = app.get("/users/me/flashcards", &alice).await;
    assert_eq!(titles(&list), vec!["Alice deck"]);
    assert_eq!(list["count"], 1);
}

#[tokio::test]
async fn second_page_of_nine_over_twenty() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    for i in 1..=20 {
        app.create_set(&token, &format!("deck {}", i), "public", 0).await;
    }

    let (_, everything) = app.get("/flashcards?name=deck&limit=20", &token).await;
    let ordered: Vec<i64> = everything["flashcardSets"]
        .as_array()
        .unwrap()
        .iter()
        .map(set_id)
        .collect();
    assert_eq!(ordered.len(), 20);

    let (status, page) = app.get("/flashcards?name=deck&limit=9&page=2", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 20);
    let page_ids: Vec<i64> = page["flashcardSets"].as_array().unwrap().iter().map(set_id).collect();
    assert_eq!(page_ids, ordered[9..18].to_vec());

    let (_, last) = app.get("/flashcards?name=deck&limit=9&page=3", &token).await;
    assert_eq!(last["flashcardSets"].as_array().unwrap().len(), 2);
    assert_eq!(last["count"], 20);
}

#[tokio::test]
async fn public_search_hides_private_sets() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    app.create_set(&alice, "Spanish verbs", "private", 0).await;
    app.create_set(&alice, "Spanish nouns", "public", 0).await;

    let (_, found) = app.get("/flashcards?name=spanish", &bob).await;
    assert_eq!(titles(&found), vec!["Spanish nouns"]);
    assert_eq!(found["count"], 1);
    assert_eq!(found["flashcardSets"][0]["username"], "alice");

    // Empty name matches every public set
    let (_, all) = app.get("/flashcards?name=", &bob).await;
    assert_eq!(all["count"], 1);

    let (status, body) = app.get("/flashcards", &bob).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn card_count_buckets() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    app.create_set(&token, "small", "public", 19).await;
    app.create_set(&token, "exactly twenty", "public", 20).await;
    app.create_set(&token, "large", "public", 50).await;

    let (_, under) = app.get("/flashcards?name=&numCards=%3C20", &token).await;
    assert_eq!(titles(&under), vec!["small"]);
    assert_eq!(under["count"], 1);

    let (_, middle) = app.get("/flashcards?name=&numCards=20-49", &token).await;
    assert_eq!(titles(&middle), vec!["exactly twenty"]);
    assert_eq!(middle["count"], 1);

    let (_, over) = app.get("/flashcards?name=&numCards=%3E%3D50", &token).await;
    assert_eq!(titles(&over), vec!["large"]);

    let (_, legacy) = app.get("/flashcards?name=&numCards=lessThanNineteen", &token).await;
    assert_eq!(titles(&legacy), vec!["small"]);

    let (status, body) = app.get("/flashcards?name=&numCards=some", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FILTER");
}

#[tokio::test]
async fn search_name_is_matched_literally() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    app.create_set(&token, "100% recall", "public", 0).await;
    app.create_set(&token, "1000 words", "public", 0).await;

    let (_, found) = app.get("/flashcards?name=100%25", &token).await;
    assert_eq!(titles(&found), vec!["100% recall"]);
}

#[tokio::test]
async fn bad_paging_values_fall_back_to_defaults() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    for i in 1..=12 {
        app.create_set(&token, &format!("set {}", i), "private", 0).await;
    }

    let (status, list) = app.get("/users/me/flashcards?limit=abc&page=-2", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["flashcardSets"].as_array().unwrap().len(), 10);
    assert_eq!(list["count"], 12);
}

#[tokio::test]
async fn malformed_query_strings_use_the_error_body() {
    let app = TestApp::new();
    let token = app.user("alice").await;
    let created = app.create_set(&token, "Query", "private", 1).await;

    let (status, body) = app.get("/flashcards?name=a&name=b", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["Error"].is_string(), "{body}");
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app.get("/users/me/flashcards?limit=1&limit=2", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["Error"].is_string(), "{body}");

    let uri = format!("/flashcards/{}?orderBy=alpha&orderBy=default", set_id(&created));
    let (status, body) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
