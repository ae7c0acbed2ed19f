//! Read-query composition for the set and card listings.
//!
//! Query parameters are parsed into typed values here, and each listing is
//! expressed as a [`Filter`]. The row page and the total count are both run
//! from that one filter.

use serde::Serialize;
use tracing::debug;

use crate::database::models::{Flashcard, FlashcardSet, Visibility};
use crate::database::{FlashcardStore, StorageResult};
use crate::error::ApiError;
use crate::filter::{Column, Filter, FilterError, Predicate, SortDirection, Table};

pub const DEFAULT_LIMIT: i64 = 10;

/// Page size and 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT, page: 1 }
    }
}

impl Pagination {
    /// Lenient parse: absent, non-numeric or < 1 values fall back to the
    /// defaults. `max_limit` caps the page size when configured.
    pub fn from_query(limit: Option<&str>, page: Option<&str>, default_limit: i64, max_limit: Option<i64>) -> Self {
        let mut limit = parse_at_least_one(limit).unwrap_or(default_limit);
        if let Some(max) = max_limit {
            limit = limit.min(max);
        }
        let page = parse_at_least_one(page).unwrap_or(1);
        Self { limit, page }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    fn apply(&self, filter: Filter) -> Result<Filter, FilterError> {
        filter.limit(self.limit, self.offset())
    }
}

fn parse_at_least_one(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok()).filter(|v| *v >= 1)
}

/// Card listings may ask for the whole set with `limit=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPagination {
    All,
    Page(Pagination),
}

impl CardPagination {
    pub fn from_query(limit: Option<&str>, page: Option<&str>, default_limit: i64, max_limit: Option<i64>) -> Self {
        match limit {
            Some("max") => CardPagination::All,
            _ => CardPagination::Page(Pagination::from_query(limit, page, default_limit, max_limit)),
        }
    }
}

/// `numCards` filter on the public search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCountBucket {
    UnderTwenty,
    TwentyToFortyNine,
    FiftyOrMore,
}

impl CardCountBucket {
    /// Empty means no bucket
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, ApiError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some("<20") | Some("lessThanNineteen") => Ok(Some(CardCountBucket::UnderTwenty)),
            Some("20-49") | Some("20–49") | Some("twentyToFourtyNine") => Ok(Some(CardCountBucket::TwentyToFortyNine)),
            Some(">=50") | Some("≥50") | Some("fiftyOrMore") => Ok(Some(CardCountBucket::FiftyOrMore)),
            Some(other) => Err(ApiError::invalid_filter(format!("Invalid numCards filter '{}'", other))),
        }
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        match self {
            CardCountBucket::UnderTwenty => vec![Predicate::Lt(Column::NumCards, 20)],
            CardCountBucket::TwentyToFortyNine => {
                vec![Predicate::Gte(Column::NumCards, 20), Predicate::Lt(Column::NumCards, 50)]
            }
            CardCountBucket::FiftyOrMore => vec![Predicate::Gte(Column::NumCards, 50)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardOrder {
    /// Insertion order
    #[default]
    Default,
    /// Term, then insertion order
    Alpha,
}

impl CardOrder {
    pub fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
        match raw {
            None | Some("default") | Some("def") => Ok(CardOrder::Default),
            Some("alpha") => Ok(CardOrder::Alpha),
            Some(other) => Err(ApiError::invalid_order(format!("Invalid orderBy '{}'", other))),
        }
    }
}

/// Exact title match, then prefix match, then recency. Without a name just
/// recency.
fn ranked_by_title(mut filter: Filter, name: Option<&str>) -> Filter {
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        filter = filter
            .where_contains(&[Column::Title], name)
            .order_exact_first(Column::Title, name)
            .order_prefix_first(Column::Title, name);
    }
    filter
        .order_by(Column::LastUpdated, SortDirection::Desc)
        .order_by(Column::SetId, SortDirection::Desc)
}

/// A user's own sets, optionally narrowed by title
pub fn owner_sets(owner_id: i64, name: Option<&str>, page: Pagination) -> Result<Filter, FilterError> {
    let filter = Filter::new(Table::FlashcardSets).where_eq(Column::OwnerId, owner_id);
    page.apply(ranked_by_title(filter, name))
}

/// Public sets matching `name`, optionally bucketed by card count
pub fn public_sets(name: &str, bucket: Option<CardCountBucket>, page: Pagination) -> Result<Filter, FilterError> {
    let mut filter = Filter::new(Table::FlashcardSets).where_eq(Column::Visibility, Visibility::Public.as_str());
    if let Some(bucket) = bucket {
        for predicate in bucket.predicates() {
            filter = filter.where_predicate(predicate);
        }
    }
    page.apply(ranked_by_title(filter, Some(name)))
}

/// Public sets of another user's profile page
pub fn user_public_sets(owner_id: i64, page: Pagination) -> Result<Filter, FilterError> {
    let filter = Filter::new(Table::FlashcardSets)
        .where_eq(Column::OwnerId, owner_id)
        .where_eq(Column::Visibility, Visibility::Public.as_str());
    page.apply(ranked_by_title(filter, None))
}

/// Cards of one (already guarded) set
pub fn set_cards(
    set_id: i64,
    search: Option<&str>,
    order: CardOrder,
    pagination: CardPagination,
) -> Result<Filter, FilterError> {
    let mut filter = Filter::new(Table::Flashcards).where_eq(Column::CardSetId, set_id);
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        filter = filter.where_contains(&[Column::Term, Column::Definition], search);
    }
    filter = match order {
        CardOrder::Default => filter.order_by(Column::CardId, SortDirection::Asc),
        CardOrder::Alpha => filter
            .order_by(Column::Term, SortDirection::Asc)
            .order_by(Column::CardId, SortDirection::Asc),
    };
    match pagination {
        CardPagination::All => Ok(filter),
        CardPagination::Page(page) => page.apply(filter),
    }
}

/// One page of rows plus the total number of matches
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub rows: Vec<T>,
    pub count: i64,
}

pub async fn fetch_sets(store: &dyn FlashcardStore, filter: &Filter) -> StorageResult<Paged<FlashcardSet>> {
    debug!(?filter, "Composing set listing");
    let (rows, count) = tokio::try_join!(store.select_sets(filter), store.count_sets(filter))?;
    Ok(Paged { rows, count })
}

pub async fn fetch_cards(store: &dyn FlashcardStore, filter: &Filter) -> StorageResult<Paged<Flashcard>> {
    debug!(?filter, "Composing card listing");
    let (rows, count) = tokio::try_join!(store.select_cards(filter), store.count_cards(filter))?;
    Ok(Paged { rows, count })
}
