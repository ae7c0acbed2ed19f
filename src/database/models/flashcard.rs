use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::filter::{Column, FieldValue, Filterable};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Flashcard {
    pub flashcard_id: i64,
    pub set_id: i64,
    pub term: String,
    pub definition: String,
}

impl Filterable for Flashcard {
    fn field(&self, column: Column) -> Option<FieldValue<'_>> {
        match column {
            Column::CardId => Some(FieldValue::Int(self.flashcard_id)),
            Column::CardSetId => Some(FieldValue::Int(self.set_id)),
            Column::Term => Some(FieldValue::Text(&self.term)),
            Column::Definition => Some(FieldValue::Text(&self.definition)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCard {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardChanges {
    pub term: Option<String>,
    pub definition: Option<String>,
}

impl CardChanges {
    pub fn is_empty(&self) -> bool {
        self.term.is_none() && self.definition.is_none()
    }
}
