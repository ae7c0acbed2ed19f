#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use flashdeck_api::config::AppConfig;
use flashdeck_api::database::MemoryStore;
use flashdeck_api::routes;
use flashdeck_api::state::AppState;

pub const PASSWORD: &str = "Secret#123";

/// Router over a fresh in-memory store
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.security.bcrypt_cost = 4;
        config.api.enable_request_logging = false;

        let store = MemoryStore::new_shared();
        let state = AppState::new(store.clone(), config).expect("valid test config");
        Self {
            router: routes::app(state),
            store,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, username: &str) -> (StatusCode, Value) {
        let body = json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": PASSWORD,
        });
        self.request(Method::POST, "/users", None, Some(body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let body = json!({ "username": username, "password": password });
        self.request(Method::POST, "/auth/tokens", None, Some(body)).await
    }

    /// Register `username` and return a bearer token for it
    pub async fn user(&self, username: &str) -> String {
        let (status, _) = self.register(username).await;
        assert_eq!(status, StatusCode::CREATED, "register {}", username);
        let (status, body) = self.login(username, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login {}", username);
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a set with `num_cards` generated cards and return its JSON
    pub async fn create_set(&self, token: &str, title: &str, visibility: &str, num_cards: usize) -> Value {
        let cards: Vec<Value> = (1..=num_cards)
            .map(|i| json!({ "term": format!("term {}", i), "definition": format!("definition {}", i) }))
            .collect();
        let body = json!({ "title": title, "visibility": visibility, "flashcards": cards });
        let (status, set) = self.post("/flashcards", token, body).await;
        assert_eq!(status, StatusCode::CREATED, "create set {}: {}", title, set);
        set
    }
}

pub fn set_id(set: &Value) -> i64 {
    set["set_id"].as_i64().unwrap()
}

pub fn titles(list: &Value) -> Vec<String> {
    list["flashcardSets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap().to_string())
        .collect()
}
