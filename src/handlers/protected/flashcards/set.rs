use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Deserialize;
use tracing::info;

use super::utils::{validate_card, validate_title, CardList, SetDetail};
use crate::database::models::{FlashcardSet, NewCard, NewSet, SetChanges, Visibility};
use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{composer, CardOrder, Principal};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSetRequest {
    pub title: String,
    #[serde(alias = "permissions")]
    pub visibility: Visibility,
    #[serde(default)]
    pub flashcards: Vec<NewCard>,
}

/// POST /flashcards
pub async fn set_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    JsonBody(body): JsonBody<CreateSetRequest>,
) -> ApiResult<SetDetail> {
    validate_title(&body.title)?;
    for card in &body.flashcards {
        validate_card(card)?;
    }

    let new_set = NewSet {
        owner_id: principal.id(),
        title: body.title,
        visibility: body.visibility,
    };
    let (set, cards) = state.counters().create_set(new_set, &body.flashcards).await?;
    let count = cards.len() as i64;
    Ok(ApiResponse::created(SetDetail {
        set,
        flashcards: CardList { cards, count },
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SetQuery {
    pub search: Option<String>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// GET /flashcards/:setId
///
/// `limit=max` returns every card of the set and ignores `page`.
pub async fn set_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(raw_set_id): Path<String>,
    QueryParams(query): QueryParams<SetQuery>,
) -> ApiResult<SetDetail> {
    let order = CardOrder::parse(query.order_by.as_deref())?;
    let pagination = state.card_pagination(query.limit.as_deref(), query.page.as_deref());

    let set = state.guard().owner_or_public(&principal, &raw_set_id).await?;

    let filter = composer::set_cards(set.set_id, query.search.as_deref(), order, pagination)?;
    let paged = composer::fetch_cards(state.store.as_ref(), &filter).await?;
    Ok(ApiResponse::success(SetDetail {
        set,
        flashcards: CardList::from(paged),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SetPatch {
    pub title: Option<String>,
    #[serde(alias = "permissions")]
    pub visibility: Option<Visibility>,
}

/// PATCH /flashcards/:setId
pub async fn set_patch(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(raw_set_id): Path<String>,
    JsonBody(body): JsonBody<SetPatch>,
) -> ApiResult<FlashcardSet> {
    let changes = SetChanges {
        title: body.title,
        visibility: body.visibility,
    };
    if changes.is_empty() {
        return Err(ApiError::validation("Provide a title or visibility to update"));
    }
    if let Some(title) = &changes.title {
        validate_title(title)?;
    }

    let set = state.guard().owner_only(&principal, &raw_set_id).await?;
    let updated = state.counters().edit_set(set.set_id, &changes).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /flashcards/:setId
pub async fn set_delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(raw_set_id): Path<String>,
) -> ApiResult<()> {
    let set = state.guard().owner_only(&principal, &raw_set_id).await?;
    if !state.store.delete_set(set.set_id).await? {
        return Err(ApiError::not_found(format!("Flashcard set {} not found", set.set_id)));
    }

    info!(set_id = set.set_id, owner_id = set.owner_id, "Flashcard set deleted");
    Ok(ApiResponse::<()>::no_content())
}
