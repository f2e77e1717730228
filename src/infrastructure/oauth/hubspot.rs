use super::provider::{OAuthProvider, OAuthProviderError};
use crate::domain::auth::OAuthTokenResponse;
use async_trait::async_trait;

const AUTHORIZE_PATH: &str = "/oauth/authorize";
const TOKEN_PATH: &str = "/oauth/v1/token";

pub struct HubSpotOAuthClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scopes: String,
    auth_base_url: String,
    api_base_url: String,
    http_client: reqwest::Client,
}

impl HubSpotOAuthClient {
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        scopes: String,
        auth_base_url: String,
        api_base_url: String,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            scopes,
            auth_base_url: auth_base_url.trim_end_matches('/').to_string(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    async fn request_tokens(
        &self,
        grant: &[(&str, &str)],
    ) -> Result<OAuthTokenResponse, OAuthProviderError> {
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        params.extend_from_slice(grant);

        let response = self
            .http_client
            .post(format!("{}{}", self.api_base_url, TOKEN_PATH))
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OAuthProviderError::Timeout
                } else {
                    OAuthProviderError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OAuthProviderError::from_status(status.as_u16(), &error_text));
        }

        response
            .json::<OAuthTokenResponse>()
            .await
            .map_err(|e| OAuthProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl OAuthProvider for HubSpotOAuthClient {
    fn authorization_url(&self) -> String {
        format!(
            "{}{}?client_id={}&redirect_uri={}&scope={}",
            self.auth_base_url,
            AUTHORIZE_PATH,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scopes),
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokenResponse, OAuthProviderError> {
        self.request_tokens(&[("grant_type", "authorization_code"), ("code", code)])
            .await
    }

    async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<OAuthTokenResponse, OAuthProviderError> {
        self.request_tokens(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }
}
