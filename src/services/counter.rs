use std::sync::Arc;

use tracing::info;

use crate::database::models::{CardChanges, Flashcard, FlashcardSet, NewCard, NewSet, SetChanges};
use crate::database::{CounterAdjustment, FlashcardStore, StorageError, StorageResult};

/// Applies card and set mutations together with the set's cached
/// `num_cards` / `last_updated`, one unit of work per operation.
#[derive(Clone)]
pub struct CounterMaintainer {
    store: Arc<dyn FlashcardStore>,
}

impl CounterMaintainer {
    pub fn new(store: Arc<dyn FlashcardStore>) -> Self {
        Self { store }
    }

    /// Creates the set with `num_cards` preset to the batch size
    pub async fn create_set(&self, set: NewSet, cards: &[NewCard]) -> StorageResult<(FlashcardSet, Vec<Flashcard>)> {
        let mut uow = self.store.begin().await?;
        let set_id = uow.insert_set(&set, cards.len() as i64).await?;
        let inserted = uow.insert_cards(set_id, cards).await?;
        uow.commit().await?;

        info!(set_id, owner_id = set.owner_id, num_cards = inserted.len(), "Flashcard set created");
        let created = self.reload(set_id).await?;
        Ok((created, inserted))
    }

    pub async fn add_card(&self, set_id: i64, card: NewCard) -> StorageResult<Flashcard> {
        let mut uow = self.store.begin().await?;
        let mut inserted = uow.insert_cards(set_id, std::slice::from_ref(&card)).await?;
        ensure_set(uow.adjust_set(set_id, CounterAdjustment::Increment).await?, set_id)?;
        uow.commit().await?;

        let card = inserted
            .pop()
            .ok_or_else(|| StorageError::Backend(format!("Card insert into set {} returned no row", set_id)))?;
        info!(set_id, card_id = card.flashcard_id, "Flashcard added");
        Ok(card)
    }

    pub async fn edit_card(&self, set_id: i64, card_id: i64, changes: &CardChanges) -> StorageResult<Flashcard> {
        let mut uow = self.store.begin().await?;
        let card = uow
            .update_card(set_id, card_id, changes)
            .await?
            .ok_or_else(|| card_not_found(set_id, card_id))?;
        ensure_set(uow.adjust_set(set_id, CounterAdjustment::Touch).await?, set_id)?;
        uow.commit().await?;

        info!(set_id, card_id, "Flashcard edited");
        Ok(card)
    }

    pub async fn remove_card(&self, set_id: i64, card_id: i64) -> StorageResult<()> {
        let mut uow = self.store.begin().await?;
        if !uow.delete_card(set_id, card_id).await? {
            return Err(card_not_found(set_id, card_id));
        }
        ensure_set(uow.adjust_set(set_id, CounterAdjustment::Decrement).await?, set_id)?;
        uow.commit().await?;

        info!(set_id, card_id, "Flashcard removed");
        Ok(())
    }

    pub async fn edit_set(&self, set_id: i64, changes: &SetChanges) -> StorageResult<FlashcardSet> {
        let mut uow = self.store.begin().await?;
        ensure_set(uow.update_set(set_id, changes).await?, set_id)?;
        ensure_set(uow.adjust_set(set_id, CounterAdjustment::Touch).await?, set_id)?;
        uow.commit().await?;

        info!(set_id, "Flashcard set edited");
        self.reload(set_id).await
    }

    async fn reload(&self, set_id: i64) -> StorageResult<FlashcardSet> {
        self.store.find_set(set_id).await?.ok_or_else(|| set_not_found(set_id))
    }
}

fn ensure_set(found: bool, set_id: i64) -> StorageResult<()> {
    if found {
        Ok(())
    } else {
        Err(set_not_found(set_id))
    }
}

fn set_not_found(set_id: i64) -> StorageError {
    StorageError::NotFound(format!("Flashcard set {} not found", set_id))
}

fn card_not_found(set_id: i64, card_id: i64) -> StorageError {
    StorageError::NotFound(format!("Flashcard {} not found in set {}", card_id, set_id))
}
