use axum::extract::State;
use serde::Deserialize;

use super::utils::SetList;
use crate::error::ApiError;
use crate::extract::QueryParams;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{composer, CardCountBucket};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    #[serde(rename = "numCards")]
    pub num_cards: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// GET /flashcards
///
/// Public sets only. `name` is required but may be empty to match all.
pub async fn search_get(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> ApiResult<SetList> {
    let name = query
        .name
        .as_deref()
        .ok_or_else(|| ApiError::validation("Search name is required"))?;
    let bucket = CardCountBucket::parse(query.num_cards.as_deref())?;
    let page = state.pagination(query.limit.as_deref(), query.page.as_deref());

    let filter = composer::public_sets(name, bucket, page)?;
    let paged = composer::fetch_sets(state.store.as_ref(), &filter).await?;
    Ok(ApiResponse::success(SetList::from(paged)))
}
