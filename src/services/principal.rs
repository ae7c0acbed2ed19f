use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::TokenService;
use crate::database::models::User;
use crate::database::FlashcardStore;
use crate::error::ApiError;

/// The authenticated user behind a request. Lives only as long as the request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
}

impl Principal {
    pub fn id(&self) -> i64 {
        self.user.user_id
    }
}

/// Turns an `Authorization` header into a [`Principal`]
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn FlashcardStore>,
    tokens: Arc<TokenService>,
}

impl PrincipalResolver {
    pub fn new(store: Arc<dyn FlashcardStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    /// Verifies the bearer credential, then loads its user. One storage read.
    pub async fn resolve(&self, authorization: Option<&str>) -> Result<Principal, ApiError> {
        let token = bearer_token(authorization)?;
        let claims = self.tokens.verify(token)?;

        match self.store.find_user(claims.user_id).await? {
            Some(user) => {
                debug!(user_id = user.user_id, "Resolved principal");
                Ok(Principal { user })
            }
            None => {
                warn!(user_id = claims.user_id, "Credential refers to a missing user");
                Err(ApiError::principal_not_found("User matching token not found"))
            }
        }
    }
}

/// Extract the token from a `Bearer <token>` header value
fn bearer_token(authorization: Option<&str>) -> Result<&str, ApiError> {
    let header = authorization.ok_or_else(|| ApiError::unauthenticated("Token is not in header"))?;
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(ApiError::unauthenticated("Not authenticated")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Claims;
    use crate::database::models::NewUser;
    use crate::database::MemoryStore;
    use chrono::Duration;

    async fn resolver() -> (PrincipalResolver, Arc<TokenService>, i64) {
        let store = MemoryStore::new_shared();
        let user = store
            .create_user(NewUser {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password_hash: "x".into(),
            })
            .await
            .unwrap();
        let tokens = Arc::new(TokenService::new("test-secret", 1).unwrap());
        (PrincipalResolver::new(store, tokens.clone()), tokens, user.user_id)
    }

    #[tokio::test]
    async fn resolves_valid_bearer() {
        let (resolver, tokens, user_id) = resolver().await;
        let token = tokens.issue(user_id).unwrap().token;
        let principal = resolver.resolve(Some(&format!("Bearer {}", token))).await.unwrap();
        assert_eq!(principal.id(), user_id);
        assert_eq!(principal.user.username, "alice");
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_unauthenticated() {
        let (resolver, _, _) = resolver().await;
        let err = resolver.resolve(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(ref m) if m == "Token is not in header"));
        let err = resolver.resolve(Some("Token abc")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
        let err = resolver.resolve(Some("Bearer not-a-jwt")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn expired_credential_is_unauthenticated() {
        let (resolver, tokens, user_id) = resolver().await;
        let token = tokens.sign(&Claims::new(user_id, Duration::hours(-2))).unwrap();
        let err = resolver.resolve(Some(&format!("Bearer {}", token))).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn vanished_user_is_principal_not_found() {
        let (resolver, tokens, _) = resolver().await;
        let token = tokens.issue(999).unwrap().token;
        let err = resolver.resolve(Some(&format!("Bearer {}", token))).await.unwrap_err();
        assert!(matches!(err, ApiError::PrincipalNotFound(_)));
    }
}
