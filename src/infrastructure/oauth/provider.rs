use crate::domain::auth::OAuthTokenResponse;
use async_trait::async_trait;

/// Failure talking to the OAuth provider's token endpoint
#[derive(Debug, Clone, thiserror::Error)]
pub enum OAuthProviderError {
    /// The provider refused the grant (revoked or unknown refresh token, bad code)
    #[error("provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The provider failed or throttled; the same request may succeed later
    #[error("provider unavailable ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

impl OAuthProviderError {
    /// Whether retrying the same request can succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::Transport(_) | Self::Timeout
        )
    }

    /// Classify a non-success token endpoint answer
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .or_else(|| json.get("error_description"))
                    .or_else(|| json.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.to_string());

        if status >= 500 || status == 429 {
            Self::Upstream { status, message }
        } else {
            Self::Rejected { status, message }
        }
    }
}

/// OAuth 2.0 authorization-code provider.
///
/// Implementations own the client credentials and the redirect URI; callers
/// only deal in codes and tokens.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Consent URL the browser is sent to
    fn authorization_url(&self) -> String;

    /// Trade an authorization code for a token pair
    async fn exchange_code(&self, code: &str) -> Result<OAuthTokenResponse, OAuthProviderError>;

    /// Mint a new access token from a refresh token
    async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<OAuthTokenResponse, OAuthProviderError>;
}
