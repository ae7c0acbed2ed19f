use tracing::debug;

use super::principal::Principal;
use crate::database::models::FlashcardSet;
use crate::database::FlashcardStore;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMode {
    /// Mutations: only the owner passes, even on public sets
    OwnerOnly,
    /// Reads: the owner, or anyone when the set is public
    OwnerOrPublic,
}

/// Parse a path segment as a strictly positive integer id
pub fn parse_positive_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    let invalid = || ApiError::invalid_target(format!("Invalid {} id '{}'", what, raw));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid()),
    }
}

/// Decide whether `principal` may act on `set` under `mode`.
///
/// Private sets are reported as missing to non-owners so a read never
/// reveals that the set exists.
pub fn authorize(principal: &Principal, set: &FlashcardSet, mode: GuardMode) -> Result<(), ApiError> {
    let is_owner = set.owner_id == principal.id();
    match mode {
        GuardMode::OwnerOnly if is_owner => Ok(()),
        GuardMode::OwnerOnly => Err(ApiError::forbidden(format!(
            "User {} does not own flashcard set {}",
            principal.id(),
            set.set_id
        ))),
        GuardMode::OwnerOrPublic if is_owner || set.visibility.is_public() => Ok(()),
        GuardMode::OwnerOrPublic => Err(set_not_found(set.set_id)),
    }
}

fn set_not_found(set_id: i64) -> ApiError {
    ApiError::not_found(format!("Flashcard set {} not found", set_id))
}

/// Loads a target set and checks it against the principal before any handler
/// logic runs
pub struct SetGuard<'a> {
    store: &'a dyn FlashcardStore,
}

impl<'a> SetGuard<'a> {
    pub fn new(store: &'a dyn FlashcardStore) -> Self {
        Self { store }
    }

    pub async fn owner_only(&self, principal: &Principal, raw_set_id: &str) -> Result<FlashcardSet, ApiError> {
        self.check(principal, raw_set_id, GuardMode::OwnerOnly).await
    }

    pub async fn owner_or_public(&self, principal: &Principal, raw_set_id: &str) -> Result<FlashcardSet, ApiError> {
        self.check(principal, raw_set_id, GuardMode::OwnerOrPublic).await
    }

    pub async fn check(
        &self,
        principal: &Principal,
        raw_set_id: &str,
        mode: GuardMode,
    ) -> Result<FlashcardSet, ApiError> {
        let set_id = parse_positive_id(raw_set_id, "flashcard set")?;
        let set = self
            .store
            .find_set(set_id)
            .await?
            .ok_or_else(|| set_not_found(set_id))?;

        let outcome = authorize(principal, &set, mode);
        debug!(set_id, user_id = principal.id(), ?mode, allowed = outcome.is_ok(), "Set guard");
        outcome.map(|_| set)
    }
}
