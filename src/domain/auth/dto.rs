use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body returned by the provider's token endpoint for both the code
/// exchange and the refresh grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Query string HubSpot appends when redirecting back from the consent screen
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Token status exposed to the browser; never carries the tokens themselves
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenStatusResponse {
    pub authenticated: bool,
    pub expired: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub seconds_remaining: i64,
    pub updated_at: Option<DateTime<Utc>>,
}
