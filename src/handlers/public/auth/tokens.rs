use axum::extract::State;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::IssuedToken;
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/tokens
///
/// Unknown usernames are 404 and wrong passwords 401, with one shared message.
pub async fn tokens_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TokenRequest>,
) -> ApiResult<IssuedToken> {
    let user = state
        .store
        .find_user_by_username(&body.username)
        .await?
        .ok_or_else(|| ApiError::not_found(BAD_CREDENTIALS))?;

    if !state.passwords.verify(&body.password, &user.password_hash).await? {
        warn!(user_id = user.user_id, "Rejected login");
        return Err(ApiError::unauthenticated(BAD_CREDENTIALS));
    }

    let issued = state.tokens.issue(user.user_id)?;
    info!(user_id = user.user_id, "Issued credential");
    Ok(ApiResponse::success(issued))
}
