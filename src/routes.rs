use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::handlers::protected::{flashcards, users};
use crate::handlers::public::auth;
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);
    let request_logging = state.config.api.enable_request_logging;

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state)
        .layer(cors);

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/tokens", post(auth::tokens_post))
        .route("/users", post(auth::register_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Users
        .route("/users/me", get(users::me_get).patch(users::me_patch))
        .route("/users/me/password", patch(users::password_patch))
        .route("/users/me/flashcards", get(users::my_sets_get))
        .route("/users/:user_id", get(users::profile_get))
        // Sets
        .route("/flashcards", get(flashcards::search_get).post(flashcards::set_post))
        .route(
            "/flashcards/:set_id",
            get(flashcards::set_get)
                .post(flashcards::card_post)
                .patch(flashcards::set_patch)
                .delete(flashcards::set_delete),
        )
        // Cards
        .route(
            "/flashcards/:set_id/:card_id",
            get(flashcards::card_get)
                .patch(flashcards::card_patch)
                .delete(flashcards::card_delete),
        )
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Flashdeck API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/auth/tokens, /users (public)",
            "users": "/users/me[/password|/flashcards], /users/:userId (protected)",
            "flashcards": "/flashcards[/:setId[/:cardId]] (protected)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
