use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::filter::{Column, FieldValue, Filterable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[serde(alias = "pub")]
    Public,
    #[serde(alias = "pri")]
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Visibility {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "public" | "pub" => Ok(Visibility::Public),
            "private" | "pri" => Ok(Visibility::Private),
            other => Err(format!("Unknown visibility '{}'", other)),
        }
    }
}

/// A set row joined with its owner's username
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlashcardSet {
    pub set_id: i64,
    pub title: String,
    pub owner_id: i64,
    #[serde(rename = "username")]
    pub owner_username: String,
    #[sqlx(try_from = "String")]
    pub visibility: Visibility,
    pub num_cards: i64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Filterable for FlashcardSet {
    fn field(&self, column: Column) -> Option<FieldValue<'_>> {
        match column {
            Column::SetId => Some(FieldValue::Int(self.set_id)),
            Column::Title => Some(FieldValue::Text(&self.title)),
            Column::OwnerId => Some(FieldValue::Int(self.owner_id)),
            Column::Visibility => Some(FieldValue::Text(self.visibility.as_str())),
            Column::NumCards => Some(FieldValue::Int(self.num_cards)),
            Column::LastUpdated => Some(FieldValue::Time(self.last_updated)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSet {
    pub owner_id: i64,
    pub title: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetChanges {
    pub title: Option<String>,
    pub visibility: Option<Visibility>,
}

impl SetChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.visibility.is_none()
    }
}
