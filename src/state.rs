use std::sync::Arc;

use crate::auth::{AuthError, PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::FlashcardStore;
use crate::services::{CardPagination, CounterMaintainer, Pagination, PrincipalResolver, SetGuard};

/// Shared, read-only application state. Each component gets its
/// collaborators from here rather than from globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FlashcardStore>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn FlashcardStore>, config: AppConfig) -> Result<Self, AuthError> {
        let tokens = TokenService::from_config(&config.security)?;
        Ok(Self {
            store,
            tokens: Arc::new(tokens),
            passwords: PasswordHasher::new(config.security.bcrypt_cost),
            config: Arc::new(config),
        })
    }

    pub fn resolver(&self) -> PrincipalResolver {
        PrincipalResolver::new(self.store.clone(), self.tokens.clone())
    }

    pub fn guard(&self) -> SetGuard<'_> {
        SetGuard::new(self.store.as_ref())
    }

    pub fn counters(&self) -> CounterMaintainer {
        CounterMaintainer::new(self.store.clone())
    }

    pub fn pagination(&self, limit: Option<&str>, page: Option<&str>) -> Pagination {
        let query = &self.config.query;
        Pagination::from_query(limit, page, query.default_limit, query.max_limit)
    }

    pub fn card_pagination(&self, limit: Option<&str>, page: Option<&str>) -> CardPagination {
        let query = &self.config.query;
        CardPagination::from_query(limit, page, query.default_limit, query.max_limit)
    }
}
