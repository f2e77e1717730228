use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::{
    domain::auth::TokenService,
    error::{error_page_location, AppError, ERROR_PATH, LOGIN_PATH},
    infrastructure::{
        config::Config,
        crm::{CrmApi, CrmSession},
    },
};

/// Paths the gate never guards, so a redirect target cannot redirect again
const GATE_EXEMPT_PREFIXES: &[&str] = &[ERROR_PATH, LOGIN_PATH];

/// Paths served even without client credentials
const CONFIG_EXEMPT_PREFIXES: &[&str] = &[ERROR_PATH, "/health"];

/// Shared state of the authorization gate
#[derive(Clone)]
pub struct GateState {
    pub token_service: Arc<TokenService>,
    pub crm: Arc<dyn CrmApi>,
}

impl GateState {
    pub fn new(token_service: Arc<TokenService>, crm: Arc<dyn CrmApi>) -> Self {
        Self { token_service, crm }
    }
}

fn has_prefix(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix))
}

/// Sends every request to the error page while client credentials are missing
pub async fn config_middleware(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    if has_prefix(request.uri().path(), CONFIG_EXEMPT_PREFIXES) {
        return next.run(request).await;
    }

    if let Some(message) = config.missing_credentials_message() {
        tracing::warn!(path = %request.uri().path(), "{}", message);
        return Redirect::to(&error_page_location(&message)).into_response();
    }

    next.run(request).await
}

/// Authorization gate: makes sure a valid access token is attached to the
/// request before any protected handler runs
pub async fn authorization_gate(
    State(gate): State<GateState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if has_prefix(request.uri().path(), GATE_EXEMPT_PREFIXES) {
        return Ok(next.run(request).await);
    }

    // Refreshes when expired; every failure ends at the login page
    let access_token = gate.token_service.valid_access_token().await?;

    request
        .extensions_mut()
        .insert(CrmSession::new(access_token, gate.crm.clone()));

    Ok(next.run(request).await)
}
