use super::token_repository::TokenRepository;
use crate::domain::auth::TokenSet;
use crate::error::AppResult;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Keeps the TokenSet for the lifetime of the process only
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: RwLock<Option<TokenSet>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenSet) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> AppResult<Option<TokenSet>> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &TokenSet) -> AppResult<()> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.tokens.write().await = None;
        Ok(())
    }
}
