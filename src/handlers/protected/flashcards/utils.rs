use serde::Serialize;

use crate::database::models::{Flashcard, FlashcardSet, NewCard};
use crate::error::ApiError;
use crate::services::Paged;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_CARD_TEXT_LEN: usize = 2000;

pub fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::validation(format!("Title must be at most {} characters", MAX_TITLE_LEN)));
    }
    Ok(())
}

pub fn validate_card_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{} is required", capitalize(field))));
    }
    if value.chars().count() > MAX_CARD_TEXT_LEN {
        return Err(ApiError::validation(format!(
            "{} must be at most {} characters",
            capitalize(field),
            MAX_CARD_TEXT_LEN
        )));
    }
    Ok(())
}

pub fn validate_card(card: &NewCard) -> Result<(), ApiError> {
    validate_card_text("term", &card.term)?;
    validate_card_text("definition", &card.definition)
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `{flashcardSets, count}`
#[derive(Debug, Serialize)]
pub struct SetList {
    #[serde(rename = "flashcardSets")]
    pub flashcard_sets: Vec<FlashcardSet>,
    pub count: i64,
}

impl From<Paged<FlashcardSet>> for SetList {
    fn from(paged: Paged<FlashcardSet>) -> Self {
        Self {
            flashcard_sets: paged.rows,
            count: paged.count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardList {
    pub cards: Vec<Flashcard>,
    pub count: i64,
}

impl From<Paged<Flashcard>> for CardList {
    fn from(paged: Paged<Flashcard>) -> Self {
        Self {
            cards: paged.rows,
            count: paged.count,
        }
    }
}

/// Set metadata with a page of its cards nested under `flashcards`
#[derive(Debug, Serialize)]
pub struct SetDetail {
    #[serde(flatten)]
    pub set: FlashcardSet,
    pub flashcards: CardList,
}
