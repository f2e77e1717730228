use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

use super::pages;
use crate::{
    domain::auth::{OAuthCallbackParams, TokenService, TokenStatusResponse},
    error::{AppError, AppResult},
    infrastructure::oauth::OAuthProvider,
};

pub struct OAuthController {
    oauth_provider: Arc<dyn OAuthProvider>,
    token_service: Arc<TokenService>,
}

impl OAuthController {
    pub fn new(oauth_provider: Arc<dyn OAuthProvider>, token_service: Arc<TokenService>) -> Self {
        Self {
            oauth_provider,
            token_service,
        }
    }

    /// GET /oauth - Send the browser to the HubSpot consent screen
    pub async fn initiate(State(controller): State<Arc<OAuthController>>) -> impl IntoResponse {
        let auth_url = controller.oauth_provider.authorization_url();
        tracing::info!(authorization_url = %auth_url, "Redirecting to HubSpot consent screen");

        Redirect::temporary(&auth_url)
    }

    /// GET /oauth-callback - Exchange the authorization code for tokens
    pub async fn callback(
        State(controller): State<Arc<OAuthController>>,
        Query(params): Query<OAuthCallbackParams>,
    ) -> AppResult<Redirect> {
        if let Some(error) = params.error {
            let description = params.error_description.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Authorization was not granted: {} {}",
                error, description
            )
            .trim()
            .to_string()));
        }

        let code = params
            .code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

        tracing::info!("Retrieving access token by code");
        controller.token_service.exchange_code(&code).await?;

        Ok(Redirect::to("/"))
    }

    /// GET /login - Login page, or home when tokens are already present
    pub async fn login(State(controller): State<Arc<OAuthController>>) -> Response {
        let is_logged_in = controller.token_service.is_authenticated().await;
        tracing::debug!(is_logged_in, "Login page requested");

        if is_logged_in {
            return Redirect::to("/").into_response();
        }
        Html(pages::login_page()).into_response()
    }

    /// GET /logout - Forget the tokens and start over
    pub async fn logout(State(controller): State<Arc<OAuthController>>) -> Redirect {
        controller.token_service.logout().await;
        Redirect::to("/")
    }

    /// GET /refresh - Force a token refresh
    pub async fn refresh(State(controller): State<Arc<OAuthController>>) -> AppResult<Redirect> {
        let tokens = controller.token_service.refresh().await?;
        tracing::info!(expires_at = %tokens.expires_at(), "Tokens refreshed on request");

        Ok(Redirect::to("/"))
    }

    /// GET /tokens - Token status for the connected portal
    pub async fn status(
        State(controller): State<Arc<OAuthController>>,
    ) -> Json<TokenStatusResponse> {
        Json(controller.token_service.status().await)
    }
}
