use axum::{extract::State, Extension};
use serde::Deserialize;

use crate::extract::QueryParams;
use crate::handlers::protected::flashcards::utils::SetList;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{composer, Principal};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MySetsQuery {
    pub name: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// GET /users/me/flashcards
pub async fn my_sets_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    QueryParams(query): QueryParams<MySetsQuery>,
) -> ApiResult<SetList> {
    let page = state.pagination(query.limit.as_deref(), query.page.as_deref());
    let filter = composer::owner_sets(principal.id(), query.name.as_deref(), page)?;
    let paged = composer::fetch_sets(state.store.as_ref(), &filter).await?;
    Ok(ApiResponse::success(SetList::from(paged)))
}
