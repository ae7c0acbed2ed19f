use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Deserialize;

use super::utils::{validate_card, validate_card_text};
use crate::database::models::{CardChanges, Flashcard, NewCard};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{parse_positive_id, Principal};
use crate::state::AppState;

/// POST /flashcards/:setId
pub async fn card_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(raw_set_id): Path<String>,
    JsonBody(card): JsonBody<NewCard>,
) -> ApiResult<Flashcard> {
    validate_card(&card)?;

    let set = state.guard().owner_only(&principal, &raw_set_id).await?;
    let created = state.counters().add_card(set.set_id, card).await?;
    Ok(ApiResponse::created(created))
}

/// GET /flashcards/:setId/:cardId
///
/// Cards inherit their set's visibility: a card under someone else's private
/// set is reported exactly like the set itself.
pub async fn card_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((raw_set_id, raw_card_id)): Path<(String, String)>,
) -> ApiResult<Flashcard> {
    let set = state.guard().owner_or_public(&principal, &raw_set_id).await?;
    let card_id = parse_positive_id(&raw_card_id, "flashcard")?;

    let card = state
        .store
        .find_card(set.set_id, card_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Flashcard {} not found in set {}", card_id, set.set_id)))?;
    Ok(ApiResponse::success(card))
}

#[derive(Debug, Deserialize)]
pub struct CardPatch {
    pub term: Option<String>,
    pub definition: Option<String>,
}

/// PATCH /flashcards/:setId/:cardId
pub async fn card_patch(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((raw_set_id, raw_card_id)): Path<(String, String)>,
    JsonBody(body): JsonBody<CardPatch>,
) -> ApiResult<Flashcard> {
    let changes = CardChanges {
        term: body.term,
        definition: body.definition,
    };
    if changes.is_empty() {
        return Err(ApiError::validation("Provide a term or definition to update"));
    }
    if let Some(term) = &changes.term {
        validate_card_text("term", term)?;
    }
    if let Some(definition) = &changes.definition {
        validate_card_text("definition", definition)?;
    }

    let set = state.guard().owner_only(&principal, &raw_set_id).await?;
    let card_id = parse_positive_id(&raw_card_id, "flashcard")?;
    let card = state.counters().edit_card(set.set_id, card_id, &changes).await?;
    Ok(ApiResponse::success(card))
}

/// DELETE /flashcards/:setId/:cardId
pub async fn card_delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((raw_set_id, raw_card_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let set = state.guard().owner_only(&principal, &raw_set_id).await?;
    let card_id = parse_positive_id(&raw_card_id, "flashcard")?;
    state.counters().remove_card(set.set_id, card_id).await?;
    Ok(ApiResponse::<()>::no_content())
}
