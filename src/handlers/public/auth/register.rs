use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use super::utils::{validate_email, validate_password, validate_username};
use crate::database::models::{NewUser, UserProfile};
use crate::extract::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// POST /users
///
/// Taken usernames or emails surface as 409 from the store's uniqueness check.
pub async fn register_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> ApiResult<UserProfile> {
    validate_username(&body.username)?;
    validate_email(&body.email)?;
    validate_password(&body.password)?;

    let password_hash = state.passwords.hash(&body.password).await?;
    let user = state
        .store
        .create_user(NewUser {
            username: body.username,
            email: body.email,
            password_hash,
        })
        .await?;

    info!(user_id = user.user_id, "User registered");
    Ok(ApiResponse::created(UserProfile::from(&user)))
}
