use axum::{extract::State, Extension};
use serde::Deserialize;
use tracing::info;

use crate::database::models::{ProfileChanges, UserProfile};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::handlers::public::auth::utils::{validate_email, validate_password, validate_username};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Principal;
use crate::state::AppState;

/// GET /users/me
pub async fn me_get(Extension(principal): Extension<Principal>) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(UserProfile::from(&principal.user)))
}

#[derive(Debug, Deserialize)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// PATCH /users/me
///
/// Every supplied field is checked before the single write.
pub async fn me_patch(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<ProfilePatch>,
) -> ApiResult<UserProfile> {
    let changes = ProfileChanges {
        username: body.username,
        email: body.email,
    };
    if changes.is_empty() {
        return Err(ApiError::validation("Provide a username or email to update"));
    }
    if let Some(username) = &changes.username {
        validate_username(username)?;
    }
    if let Some(email) = &changes.email {
        validate_email(email)?;
    }

    let user = state.store.update_user(principal.id(), &changes).await?;
    info!(user_id = user.user_id, "Profile updated");
    Ok(ApiResponse::success(UserProfile::from(&user)))
}

#[derive(Debug, Deserialize)]
pub struct PasswordPatch {
    pub old: String,
    pub password: String,
}

/// PATCH /users/me/password
pub async fn password_patch(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<PasswordPatch>,
) -> ApiResult<()> {
    validate_password(&body.password)?;

    if !state.passwords.verify(&body.old, &principal.user.password_hash).await? {
        return Err(ApiError::unauthenticated("Old password is incorrect"));
    }

    let password_hash = state.passwords.hash(&body.password).await?;
    state.store.set_password_hash(principal.id(), &password_hash).await?;

    info!(user_id = principal.id(), "Password changed");
    Ok(ApiResponse::<()>::no_content())
}
