use crate::domain::auth::TokenSet;
use crate::error::AppResult;
use async_trait::async_trait;

/// Durable home of the single TokenSet.
/// Abstracts the backing store (JSON file, Postgres row, process memory)
///
/// Durability is best-effort: callers log failures and keep serving from
/// the in-memory copy.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Short backend name reported by the readiness check
    fn backend(&self) -> &'static str;

    /// Read the persisted set; `None` when nothing was ever saved
    async fn load(&self) -> AppResult<Option<TokenSet>>;

    /// Replace the persisted set
    async fn save(&self, tokens: &TokenSet) -> AppResult<()>;

    /// Remove the persisted set
    async fn clear(&self) -> AppResult<()>;

    /// Check the backing store is reachable
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
