use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::dto::OAuthTokenResponse;

/// Access/refresh token pair for the single connected HubSpot portal.
///
/// `updated_at` is the moment the access token was issued; together with
/// `expires_in` it decides whether the access token can still be used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub updated_at: DateTime<Utc>,
}

impl TokenSet {
    /// The unauthenticated set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from a freshly issued provider response
    pub fn issued(response: OAuthTokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.unwrap_or_default(),
            expires_in: response.expires_in,
            updated_at: now.trunc_subsecs(3),
        }
    }

    /// Without a refresh token nothing short of a new consent can recover the set
    pub fn is_authenticated(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.updated_at + Duration::seconds(self.expires_in)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// Seconds of validity left at `now`, never negative
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at() - now).num_seconds().max(0)
    }

    /// Apply a refresh response in place. The refresh token is only replaced
    /// when the provider rotated it.
    pub fn apply_refresh(&mut self, response: OAuthTokenResponse, now: DateTime<Utc>) {
        self.access_token = response.access_token;
        self.expires_in = response.expires_in;
        self.updated_at = now.trunc_subsecs(3);
        if let Some(refresh_token) = response.refresh_token.filter(|t| !t.is_empty()) {
            self.refresh_token = refresh_token;
        }
    }
}
