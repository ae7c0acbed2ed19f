//! In-memory [`FlashcardStore`] used by tests and local runs without Postgres.
//!
//! Every filter is evaluated through [`Filter::apply`], so the in-memory rows
//! are selected, ranked and paged by the same filter object the SQL backend
//! compiles.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::error::{StorageError, StorageResult};
use super::models::{
    CardChanges, Flashcard, FlashcardSet, NewCard, NewSet, NewUser, ProfileChanges, SetChanges, User,
};
use super::store::{CounterAdjustment, FlashcardStore, UnitOfWork};
use crate::filter::Filter;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    sets: BTreeMap<i64, FlashcardSet>,
    cards: BTreeMap<i64, Flashcard>,
    last_user_id: i64,
    last_set_id: i64,
    last_card_id: i64,
}

impl MemoryState {
    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.user_id) != except)
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.user_id) != except)
    }

    /// Set row with the owner's current username joined in
    fn joined(&self, set: &FlashcardSet) -> FlashcardSet {
        let mut joined = set.clone();
        if let Some(owner) = self.users.get(&set.owner_id) {
            joined.owner_username = owner.username.clone();
        }
        joined
    }
}

/// Strictly later than `previous`, and never behind the wall clock
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    let bumped = previous + Duration::microseconds(1);
    if now > bumped {
        now
    } else {
        bumped
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl FlashcardStore for MemoryStore {
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn begin(&self) -> StorageResult<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, staged }))
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let mut state = self.state.lock().await;
        if state.username_taken(&user.username, None) {
            return Err(StorageError::Conflict("Username already exists".to_string()));
        }
        if state.email_taken(&user.email, None) {
            return Err(StorageError::Conflict("Account with email already exists".to_string()));
        }
        state.last_user_id += 1;
        let created = User {
            user_id: state.last_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        state.users.insert(created.user_id, created.clone());
        Ok(created)
    }

    async fn find_user(&self, user_id: i64) -> StorageResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, user_id: i64, changes: &ProfileChanges) -> StorageResult<User> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&user_id) {
            return Err(StorageError::NotFound(format!("User {} not found", user_id)));
        }
        if let Some(username) = &changes.username {
            if state.username_taken(username, Some(user_id)) {
                return Err(StorageError::Conflict("Username already exists".to_string()));
            }
        }
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(user_id)) {
                return Err(StorageError::Conflict("Account with email already exists".to_string()));
            }
        }
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StorageError::NotFound(format!("User {} not found", user_id)))?;
        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        Ok(user.clone())
    }

    async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> StorageResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StorageError::NotFound(format!("User {} not found", user_id)))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn find_set(&self, set_id: i64) -> StorageResult<Option<FlashcardSet>> {
        let state = self.state.lock().await;
        Ok(state.sets.get(&set_id).map(|s| state.joined(s)))
    }

    async fn select_sets(&self, filter: &Filter) -> StorageResult<Vec<FlashcardSet>> {
        filter.validate()?;
        let state = self.state.lock().await;
        Ok(filter.apply(state.sets.values().map(|s| state.joined(s))))
    }

    async fn count_sets(&self, filter: &Filter) -> StorageResult<i64> {
        filter.validate()?;
        let state = self.state.lock().await;
        Ok(filter.count(state.sets.values()))
    }

    async fn delete_set(&self, set_id: i64) -> StorageResult<bool> {
        let mut state = self.state.lock().await;
        if state.sets.remove(&set_id).is_none() {
            return Ok(false);
        }
        state.cards.retain(|_, card| card.set_id != set_id);
        Ok(true)
    }

    async fn find_card(&self, set_id: i64, card_id: i64) -> StorageResult<Option<Flashcard>> {
        let state = self.state.lock().await;
        Ok(state.cards.get(&card_id).filter(|c| c.set_id == set_id).cloned())
    }

    async fn select_cards(&self, filter: &Filter) -> StorageResult<Vec<Flashcard>> {
        filter.validate()?;
        let state = self.state.lock().await;
        Ok(filter.apply(state.cards.values().cloned()))
    }

    async fn count_cards(&self, filter: &Filter) -> StorageResult<i64> {
        filter.validate()?;
        let state = self.state.lock().await;
        Ok(filter.count(state.cards.values()))
    }
}

/// Holds the store lock for its whole lifetime and writes to a staged copy;
/// `commit` swaps the copy in, dropping discards it.
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert_set(&mut self, set: &NewSet, num_cards: i64) -> StorageResult<i64> {
        let owner = self
            .staged
            .users
            .get(&set.owner_id)
            .ok_or_else(|| StorageError::NotFound(format!("User {} not found", set.owner_id)))?;
        let owner_username = owner.username.clone();
        self.staged.last_set_id += 1;
        let now = Utc::now();
        let row = FlashcardSet {
            set_id: self.staged.last_set_id,
            title: set.title.clone(),
            owner_id: set.owner_id,
            owner_username,
            visibility: set.visibility,
            num_cards,
            created_at: now,
            last_updated: now,
        };
        self.staged.sets.insert(row.set_id, row);
        Ok(self.staged.last_set_id)
    }

    async fn update_set(&mut self, set_id: i64, changes: &SetChanges) -> StorageResult<bool> {
        let Some(set) = self.staged.sets.get_mut(&set_id) else {
            return Ok(false);
        };
        if let Some(title) = &changes.title {
            set.title = title.clone();
        }
        if let Some(visibility) = changes.visibility {
            set.visibility = visibility;
        }
        Ok(true)
    }

    async fn insert_cards(&mut self, set_id: i64, cards: &[NewCard]) -> StorageResult<Vec<Flashcard>> {
        if !self.staged.sets.contains_key(&set_id) {
            return Err(StorageError::NotFound(format!("Flashcard set {} not found", set_id)));
        }
        let mut inserted = Vec::with_capacity(cards.len());
        for card in cards {
            self.staged.last_card_id += 1;
            let row = Flashcard {
                flashcard_id: self.staged.last_card_id,
                set_id,
                term: card.term.clone(),
                definition: card.definition.clone(),
            };
            self.staged.cards.insert(row.flashcard_id, row.clone());
            inserted.push(row);
        }
        Ok(inserted)
    }

    async fn update_card(
        &mut self,
        set_id: i64,
        card_id: i64,
        changes: &CardChanges,
    ) -> StorageResult<Option<Flashcard>> {
        let Some(card) = self.staged.cards.get_mut(&card_id).filter(|c| c.set_id == set_id) else {
            return Ok(None);
        };
        if let Some(term) = &changes.term {
            card.term = term.clone();
        }
        if let Some(definition) = &changes.definition {
            card.definition = definition.clone();
        }
        Ok(Some(card.clone()))
    }

    async fn delete_card(&mut self, set_id: i64, card_id: i64) -> StorageResult<bool> {
        match self.staged.cards.get(&card_id) {
            Some(card) if card.set_id == set_id => {
                self.staged.cards.remove(&card_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn adjust_set(&mut self, set_id: i64, adjustment: CounterAdjustment) -> StorageResult<bool> {
        let Some(set) = self.staged.sets.get_mut(&set_id) else {
            return Ok(false);
        };
        let num_cards = set.num_cards + adjustment.delta();
        if num_cards < 0 {
            return Err(StorageError::Backend(format!("num_cards of set {} would go negative", set_id)));
        }
        set.num_cards = num_cards;
        set.last_updated = advance(set.last_updated);
        Ok(true)
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        let MemoryUnitOfWork { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
