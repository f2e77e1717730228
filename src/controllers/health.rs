use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::auth::TokenService;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(token_service): State<Arc<TokenService>>) -> impl IntoResponse {
    let authenticated = token_service.is_authenticated().await;

    match token_service.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "token_store": token_service.backend(),
                "authenticated": authenticated
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Token store not reachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "token_store": token_service.backend(),
                    "authenticated": authenticated
                })),
            )
        }
    }
}
