use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tower_http::trace::TraceLayer;

use crate::{
    controllers::{
        companies, contacts, health, oauth::OAuthController, pages, webhooks::WebhooksController,
    },
    domain::auth::TokenService,
    infrastructure::{
        auth::{authorization_gate, config_middleware, request_id_middleware, GateState},
        config::Config,
        crm::CrmApi,
    },
};

/// Build the application router with every route and middleware configured
pub fn build_router(
    config: Arc<Config>,
    token_service: Arc<TokenService>,
    crm: Arc<dyn CrmApi>,
    oauth_controller: Arc<OAuthController>,
    webhooks_controller: Arc<WebhooksController>,
) -> Router {
    // OAuth flow (public)
    let oauth_routes = Router::new()
        .route("/oauth", get(OAuthController::initiate))
        .route("/oauth-callback", get(OAuthController::callback))
        .route("/login", get(OAuthController::login))
        .route("/logout", get(OAuthController::logout))
        .route("/refresh", get(OAuthController::refresh))
        .with_state(oauth_controller.clone());

    // Routes behind the authorization gate
    let gated_routes = Router::new()
        .route("/", get(contacts::list_contacts))
        .route(
            "/contacts",
            get(contacts::search_contacts).post(contacts::create_or_update_contact),
        )
        .route(
            "/contacts/:vid",
            get(contacts::get_contact).post(contacts::update_contact),
        )
        .route("/companies", get(companies::list_companies))
        .route("/tokens", get(OAuthController::status))
        .with_state(oauth_controller)
        .layer(middleware::from_fn_with_state(
            GateState::new(token_service.clone(), crm),
            authorization_gate,
        ));

    // Signed by HubSpot, not gated by the user's tokens
    let webhook_routes = Router::new()
        .route("/webhooks", post(WebhooksController::receive))
        .with_state(webhooks_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(token_service)
        .route("/error", get(pages::show_error))
        .merge(oauth_routes)
        .merge(gated_routes)
        .merge(webhook_routes)
        .layer(middleware::from_fn_with_state(config, config_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until SIGTERM or SIGINT
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(await_shutdown())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn await_shutdown() {
    let (mut sig_term, mut sig_int) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "Failed to install signal handlers");
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = sig_term.recv() => tracing::info!("Received SIGTERM, shutting down"),
        _ = sig_int.recv() => tracing::info!("Received SIGINT, shutting down"),
    }
}
