use axum::{
    extract::{Path, State},
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::database::models::{FlashcardSet, PublicUser};
use crate::error::ApiError;
use crate::extract::QueryParams;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{composer, parse_positive_id, Principal};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub user: PublicUser,
    #[serde(rename = "flashcardSets")]
    pub flashcard_sets: Vec<FlashcardSet>,
    pub count: i64,
}

/// GET /users/:userId
///
/// Only the user's public sets are listed, even when the caller is that user.
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(_principal): Extension<Principal>,
    Path(raw_user_id): Path<String>,
    QueryParams(query): QueryParams<ProfileQuery>,
) -> ApiResult<PublicProfile> {
    let user_id = parse_positive_id(&raw_user_id, "user")?;
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", user_id)))?;

    let page = state.pagination(query.limit.as_deref(), query.page.as_deref());
    let filter = composer::user_public_sets(user_id, page)?;
    let paged = composer::fetch_sets(state.store.as_ref(), &filter).await?;

    Ok(ApiResponse::success(PublicProfile {
        user: PublicUser::from(&user),
        flashcard_sets: paged.rows,
        count: paged.count,
    }))
}
