//! Storage collaborator consumed by the services and handlers.
//!
//! Reads go straight through [`FlashcardStore`]. Anything that changes a set's
//! cards runs inside a [`UnitOfWork`] so the card write and the counter
//! adjustment land together or not at all.

use async_trait::async_trait;

use super::error::StorageResult;
use super::models::{
    CardChanges, Flashcard, FlashcardSet, NewCard, NewSet, NewUser, ProfileChanges, SetChanges, User,
};
use crate::filter::Filter;

/// Relative change applied to a set's cached counters.
///
/// Every variant also advances `last_updated` to at least the current time
/// and strictly past its previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAdjustment {
    Increment,
    Decrement,
    Touch,
}

impl CounterAdjustment {
    pub fn delta(&self) -> i64 {
        match self {
            CounterAdjustment::Increment => 1,
            CounterAdjustment::Decrement => -1,
            CounterAdjustment::Touch => 0,
        }
    }
}

#[async_trait]
pub trait FlashcardStore: Send + Sync + 'static {
    /// Cheap connectivity probe for `/health`.
    async fn ping(&self) -> StorageResult<()>;

    /// Opens a unit of work. Dropping it without `commit` discards every
    /// write made through it.
    async fn begin(&self) -> StorageResult<Box<dyn UnitOfWork>>;

    // Users

    /// Fails with `Conflict` when the username or email is taken.
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;

    async fn find_user(&self, user_id: i64) -> StorageResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Applies every change in one write. Fails with `Conflict` on a taken
    /// username or email and `NotFound` when the user is gone.
    async fn update_user(&self, user_id: i64, changes: &ProfileChanges) -> StorageResult<User>;

    async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> StorageResult<()>;

    // Sets

    async fn find_set(&self, set_id: i64) -> StorageResult<Option<FlashcardSet>>;

    async fn select_sets(&self, filter: &Filter) -> StorageResult<Vec<FlashcardSet>>;

    async fn count_sets(&self, filter: &Filter) -> StorageResult<i64>;

    /// Removes the set and every card in it. Returns false when nothing was
    /// deleted.
    async fn delete_set(&self, set_id: i64) -> StorageResult<bool>;

    // Cards

    async fn find_card(&self, set_id: i64, card_id: i64) -> StorageResult<Option<Flashcard>>;

    async fn select_cards(&self, filter: &Filter) -> StorageResult<Vec<Flashcard>>;

    async fn count_cards(&self, filter: &Filter) -> StorageResult<i64>;
}

/// Atomic write scope handed out by [`FlashcardStore::begin`].
#[async_trait]
pub trait UnitOfWork: Send {
    /// Inserts a set with its counter preset to `num_cards`; returns the new id.
    async fn insert_set(&mut self, set: &NewSet, num_cards: i64) -> StorageResult<i64>;

    /// Returns false when the set does not exist.
    async fn update_set(&mut self, set_id: i64, changes: &SetChanges) -> StorageResult<bool>;

    /// Inserts cards in order, so ids ascend with input position.
    async fn insert_cards(&mut self, set_id: i64, cards: &[NewCard]) -> StorageResult<Vec<Flashcard>>;

    async fn update_card(
        &mut self,
        set_id: i64,
        card_id: i64,
        changes: &CardChanges,
    ) -> StorageResult<Option<Flashcard>>;

    async fn delete_card(&mut self, set_id: i64, card_id: i64) -> StorageResult<bool>;

    /// Applies `adjustment` relative to the stored counter. Returns false when
    /// the set does not exist.
    async fn adjust_set(&mut self, set_id: i64, adjustment: CounterAdjustment) -> StorageResult<bool>;

    async fn commit(self: Box<Self>) -> StorageResult<()>;
}
