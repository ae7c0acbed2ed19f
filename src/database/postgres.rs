use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::error::{StorageError, StorageResult};
use super::models::{
    CardChanges, Flashcard, FlashcardSet, NewCard, NewSet, NewUser, ProfileChanges, SetChanges, User,
};
use super::query_builder::QueryBuilder;
use super::store::{CounterAdjustment, FlashcardStore, UnitOfWork};
use crate::filter::Filter;

const USER_COLUMNS: &str = "user_id, username, email, password_hash, created_at";

const SET_SELECT: &str = "s.set_id, s.title, s.owner_id, u.username AS owner_username, s.visibility, \
                          s.num_cards, s.created_at, s.last_updated";
const SET_FROM: &str = "\"flashcard_sets\" s INNER JOIN \"users\" u ON u.user_id = s.owner_id";

const CARD_SELECT: &str = "c.flashcard_id, c.set_id, c.term, c.definition";
const CARD_FROM: &str = "\"flashcards\" c";

/// Postgres-backed [`FlashcardStore`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    slow_query_threshold: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            slow_query_threshold: Duration::from_millis(1000),
        }
    }

    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = threshold;
        self
    }
}

#[async_trait]
impl FlashcardStore for PgStore {
    async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn begin(&self) -> StorageResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&query)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_user(&self, user_id: i64) -> StorageResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, user_id: i64, changes: &ProfileChanges) -> StorageResult<User> {
        let query = format!(
            "UPDATE users SET username = COALESCE($2, username), email = COALESCE($3, email) \
             WHERE user_id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(changes.username.as_deref())
            .bind(changes.email.as_deref())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("User {} not found", user_id)))
    }

    async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> StorageResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn find_set(&self, set_id: i64) -> StorageResult<Option<FlashcardSet>> {
        let query = format!("SELECT {} FROM {} WHERE s.set_id = $1", SET_SELECT, SET_FROM);
        let set = sqlx::query_as::<_, FlashcardSet>(&query)
            .bind(set_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(set)
    }

    async fn select_sets(&self, filter: &Filter) -> StorageResult<Vec<FlashcardSet>> {
        QueryBuilder::<FlashcardSet>::new(SET_SELECT, SET_FROM, filter)
            .slow_threshold(self.slow_query_threshold)
            .select_all(&self.pool)
            .await
    }

    async fn count_sets(&self, filter: &Filter) -> StorageResult<i64> {
        QueryBuilder::<FlashcardSet>::new(SET_SELECT, SET_FROM, filter)
            .slow_threshold(self.slow_query_threshold)
            .count(&self.pool)
            .await
    }

    async fn delete_set(&self, set_id: i64) -> StorageResult<bool> {
        // flashcards.set_id cascades
        let result = sqlx::query("DELETE FROM flashcard_sets WHERE set_id = $1")
            .bind(set_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_card(&self, set_id: i64, card_id: i64) -> StorageResult<Option<Flashcard>> {
        let query = format!(
            "SELECT {} FROM {} WHERE c.set_id = $1 AND c.flashcard_id = $2",
            CARD_SELECT, CARD_FROM
        );
        let card = sqlx::query_as::<_, Flashcard>(&query)
            .bind(set_id)
            .bind(card_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(card)
    }

    async fn select_cards(&self, filter: &Filter) -> StorageResult<Vec<Flashcard>> {
        QueryBuilder::<Flashcard>::new(CARD_SELECT, CARD_FROM, filter)
            .slow_threshold(self.slow_query_threshold)
            .select_all(&self.pool)
            .await
    }

    async fn count_cards(&self, filter: &Filter) -> StorageResult<i64> {
        QueryBuilder::<Flashcard>::new(CARD_SELECT, CARD_FROM, filter)
            .slow_threshold(self.slow_query_threshold)
            .count(&self.pool)
            .await
    }
}

/// Transaction-scoped writes; sqlx rolls the transaction back on drop.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert_set(&mut self, set: &NewSet, num_cards: i64) -> StorageResult<i64> {
        let set_id: i64 = sqlx::query_scalar(
            "INSERT INTO flashcard_sets (title, owner_id, visibility, num_cards) \
             VALUES ($1, $2, $3, $4) RETURNING set_id",
        )
        .bind(&set.title)
        .bind(set.owner_id)
        .bind(set.visibility.as_str())
        .bind(num_cards)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(set_id)
    }

    async fn update_set(&mut self, set_id: i64, changes: &SetChanges) -> StorageResult<bool> {
        let result = sqlx::query(
            "UPDATE flashcard_sets SET title = COALESCE($2, title), visibility = COALESCE($3, visibility) \
             WHERE set_id = $1",
        )
        .bind(set_id)
        .bind(changes.title.as_deref())
        .bind(changes.visibility.map(|v| v.as_str()))
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_cards(&mut self, set_id: i64, cards: &[NewCard]) -> StorageResult<Vec<Flashcard>> {
        let mut inserted = Vec::with_capacity(cards.len());
        for card in cards {
            let row = sqlx::query_as::<_, Flashcard>(
                "INSERT INTO flashcards (set_id, term, definition) VALUES ($1, $2, $3) \
                 RETURNING flashcard_id, set_id, term, definition",
            )
            .bind(set_id)
            .bind(&card.term)
            .bind(&card.definition)
            .fetch_one(&mut *self.tx)
            .await?;
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
        let card = sqlx::query_as::<_, Flashcard>(
            "UPDATE flashcards SET term = COALESCE($3, term), definition = COALESCE($4, definition) \
             WHERE set_id = $1 AND flashcard_id = $2 \
             RETURNING flashcard_id, set_id, term, definition",
        )
        .bind(set_id)
        .bind(card_id)
        .bind(changes.term.as_deref())
        .bind(changes.definition.as_deref())
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(card)
    }

    async fn delete_card(&mut self, set_id: i64, card_id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM flashcards WHERE set_id = $1 AND flashcard_id = $2")
            .bind(set_id)
            .bind(card_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_set(&mut self, set_id: i64, adjustment: CounterAdjustment) -> StorageResult<bool> {
        // Relative update: concurrent adjustments serialize on the row lock.
        let result = sqlx::query(
            "UPDATE flashcard_sets SET num_cards = num_cards + $2, \
             last_updated = GREATEST(NOW(), last_updated + INTERVAL '1 microsecond') \
             WHERE set_id = $1",
        )
        .bind(set_id)
        .bind(adjustment.delta())
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
