use super::{AuthServiceError, Clock, TokenSet, TokenStatusResponse};
use crate::{
    error::AppResult,
    infrastructure::{
        oauth::{OAuthProvider, OAuthProviderError},
        repositories::TokenRepository,
    },
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Bounds on a single refresh operation
#[derive(Debug, Clone)]
pub struct RefreshPolicy {
    /// Per-call timeout on the provider request
    pub timeout: Duration,
    /// Extra attempts after a transient failure
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each following one
    pub backoff: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 2,
            backoff: Duration::from_millis(200),
        }
    }
}

/// Process-wide owner of the TokenSet.
///
/// Reads go through an `RwLock`. Every writer (code exchange, refresh,
/// logout) holds `refresh_lock`, so a refreshed token can never be clobbered
/// by a stale one and at most one refresh call is in flight. Requests that
/// queued behind a refresh reuse its outcome through `refresh_epoch`.
pub struct TokenService {
    token_repo: Arc<dyn TokenRepository>,
    oauth_provider: Arc<dyn OAuthProvider>,
    clock: Arc<dyn Clock>,
    policy: RefreshPolicy,
    tokens: RwLock<TokenSet>,
    refresh_lock: Mutex<Option<AuthServiceError>>,
    refresh_epoch: AtomicU64,
}

impl TokenService {
    pub fn new(
        token_repo: Arc<dyn TokenRepository>,
        oauth_provider: Arc<dyn OAuthProvider>,
        clock: Arc<dyn Clock>,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            token_repo,
            oauth_provider,
            clock,
            policy,
            tokens: RwLock::new(TokenSet::empty()),
            refresh_lock: Mutex::new(None),
            refresh_epoch: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.token_repo.backend()
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.token_repo.ping().await
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Hydrate the in-memory set from storage. Never fails: a missing or
    /// unreadable record leaves the service unauthenticated.
    pub async fn load(&self) -> TokenSet {
        let loaded = match self.token_repo.load().await {
            Ok(Some(tokens)) => {
                tracing::info!(
                    backend = self.backend(),
                    authenticated = tokens.is_authenticated(),
                    expires_at = %tokens.expires_at(),
                    "Loaded persisted tokens"
                );
                tokens
            }
            Ok(None) => {
                tracing::info!(backend = self.backend(), "No persisted tokens found");
                TokenSet::empty()
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.backend(),
                    error = %e,
                    "Failed to load persisted tokens, starting unauthenticated"
                );
                TokenSet::empty()
            }
        };

        *self.tokens.write().await = loaded.clone();
        loaded
    }

    /// Persist `tokens`; failures are logged and swallowed
    pub async fn save(&self, tokens: &TokenSet) {
        if let Err(e) = self.token_repo.save(tokens).await {
            tracing::error!(backend = self.backend(), error = %e, "Failed to persist tokens");
        }
    }

    pub async fn snapshot(&self) -> TokenSet {
        self.tokens.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_authenticated()
    }

    pub async fn is_expired(&self) -> bool {
        self.tokens.read().await.is_expired_at(self.clock.now())
    }

    pub async fn status(&self) -> TokenStatusResponse {
        let tokens = self.snapshot().await;
        let now = self.clock.now();

        if !tokens.is_authenticated() {
            return TokenStatusResponse {
                authenticated: false,
                expired: true,
                expires_at: None,
                seconds_remaining: 0,
                updated_at: None,
            };
        }

        TokenStatusResponse {
            authenticated: true,
            expired: tokens.is_expired_at(now),
            expires_at: Some(tokens.expires_at()),
            seconds_remaining: tokens.seconds_remaining(now),
            updated_at: Some(tokens.updated_at),
        }
    }

    /// Trade an authorization code for tokens, replacing the current set
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthServiceError> {
        let _writer = self.refresh_lock.lock().await;

        let response = tokio::time::timeout(
            self.policy.timeout,
            self.oauth_provider.exchange_code(code),
        )
        .await
        .unwrap_or(Err(OAuthProviderError::Timeout))
        .map_err(|e| AuthServiceError::Exchange(e.to_string()))?;

        let tokens = TokenSet::issued(response, self.clock.now());
        if !tokens.is_authenticated() {
            tracing::warn!("Token response carried no refresh token");
        }

        *self.tokens.write().await = tokens.clone();
        self.save(&tokens).await;

        tracing::info!(expires_at = %tokens.expires_at(), "Stored tokens from authorization code");
        Ok(tokens)
    }

    /// Access token usable right now, refreshing it first when expired
    pub async fn valid_access_token(&self) -> Result<String, AuthServiceError> {
        // Read the epoch before the tokens: a refresh writes tokens first
        let observed_epoch = self.refresh_epoch.load(Ordering::Acquire);
        let current = self.snapshot().await;

        if !current.is_authenticated() {
            return Err(AuthServiceError::NotAuthenticated);
        }
        if !current.is_expired_at(self.clock.now()) {
            return Ok(current.access_token);
        }

        tracing::debug!(expired_at = %current.expires_at(), "Access token expired");
        let refreshed = self.refresh_once(observed_epoch).await?;
        Ok(refreshed.access_token)
    }

    /// Refresh regardless of expiry
    pub async fn refresh(&self) -> Result<TokenSet, AuthServiceError> {
        let mut last_failure = self.refresh_lock.lock().await;

        let current = self.snapshot().await;
        if !current.is_authenticated() {
            return Err(AuthServiceError::NotAuthenticated);
        }

        let outcome = self.refresh_with_retry(&current.refresh_token).await;
        *last_failure = outcome.as_ref().err().cloned();
        self.refresh_epoch.fetch_add(1, Ordering::Release);
        outcome
    }

    /// Reset to the unauthenticated set and drop the persisted record
    pub async fn logout(&self) {
        let _writer = self.refresh_lock.lock().await;
        self.reset().await;
        tracing::info!("Tokens cleared");
    }

    async fn refresh_once(&self, observed_epoch: u64) -> Result<TokenSet, AuthServiceError> {
        let mut last_failure = self.refresh_lock.lock().await;

        if self.refresh_epoch.load(Ordering::Acquire) != observed_epoch {
            tracing::debug!("Reusing outcome of concurrent refresh");
            let current = self.snapshot().await;
            if current.is_authenticated() && !current.is_expired_at(self.clock.now()) {
                return Ok(current);
            }
            if let Some(failure) = last_failure.clone() {
                return Err(failure);
            }
            // The shared refresh succeeded but its token is already stale
        }

        // A code exchange or logout may have run while this request waited
        let current = self.snapshot().await;
        if !current.is_authenticated() {
            return Err(AuthServiceError::NotAuthenticated);
        }
        if !current.is_expired_at(self.clock.now()) {
            return Ok(current);
        }

        let outcome = self.refresh_with_retry(&current.refresh_token).await;
        *last_failure = outcome.as_ref().err().cloned();
        self.refresh_epoch.fetch_add(1, Ordering::Release);
        outcome
    }

    async fn refresh_with_retry(&self, refresh_token: &str) -> Result<TokenSet, AuthServiceError> {
        let mut attempt: u32 = 0;

        loop {
            let result = tokio::time::timeout(
                self.policy.timeout,
                self.oauth_provider.refresh_token(refresh_token),
            )
            .await
            .unwrap_or(Err(OAuthProviderError::Timeout));

            match result {
                Ok(response) => {
                    let updated = {
                        let mut tokens = self.tokens.write().await;
                        tokens.apply_refresh(response, self.clock.now());
                        tokens.clone()
                    };
                    self.save(&updated).await;

                    tracing::info!(
                        attempt,
                        expires_at = %updated.expires_at(),
                        "Access token refreshed"
                    );
                    return Ok(updated);
                }
                Err(err) if err.is_transient() && attempt < self.policy.max_retries => {
                    let delay = self.policy.backoff * 2u32.saturating_pow(attempt);
                    tracing::warn!(
                        error = %err,
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        "Token refresh failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) if err.is_transient() => {
                    tracing::error!(error = %err, attempts = attempt + 1, "Token refresh failed");
                    return Err(AuthServiceError::RefreshUnavailable(err.to_string()));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Refresh token rejected, clearing tokens");
                    self.reset().await;
                    return Err(AuthServiceError::RefreshRejected(err.to_string()));
                }
            }
        }
    }

    async fn reset(&self) {
        *self.tokens.write().await = TokenSet::empty();
        if let Err(e) = self.token_repo.clear().await {
            tracing::error!(backend = self.backend(), error = %e, "Failed to clear persisted tokens");
        }
    }
}
