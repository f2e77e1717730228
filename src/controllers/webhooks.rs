use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::{
        auth::TokenService,
        deals::{Deal, NewDeal},
        webhooks::{verify_signature, WebhookEvent, WebhookReceipt, SIGNATURE_HEADER},
    },
    error::{AppError, AppResult, ErrorResponse},
    infrastructure::crm::{CrmApi, CrmSession},
};

pub struct WebhooksController {
    client_secret: String,
    token_service: Arc<TokenService>,
    crm: Arc<dyn CrmApi>,
}

impl WebhooksController {
    pub fn new(
        client_secret: String,
        token_service: Arc<TokenService>,
        crm: Arc<dyn CrmApi>,
    ) -> Self {
        Self {
            client_secret,
            token_service,
            crm,
        }
    }

    /// POST /webhooks - Signed event batch from HubSpot
    pub async fn receive(
        State(controller): State<Arc<WebhooksController>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing webhook signature".to_string()))?;

        if !verify_signature(&controller.client_secret, &body, signature) {
            return Err(AppError::Unauthorized(
                "Invalid webhook signature".to_string(),
            ));
        }

        let events: Vec<WebhookEvent> = match serde_json::from_slice(&body) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed webhook payload");
                return Ok((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        message: format!("Malformed webhook payload: {}", e),
                    }),
                )
                    .into_response());
            }
        };

        for event in &events {
            tracing::info!(
                event_id = event.event_id,
                portal_id = event.portal_id,
                object_id = event.object_id,
                subscription_type = %event.subscription_type,
                event = %event.event_name(),
                attempt = event.attempt_number,
                "Webhook event received"
            );
        }

        let deals_created = controller.create_deals_for_new_contacts(&events).await;

        Ok(Json(WebhookReceipt {
            received: events.len(),
            deals_created,
        })
        .into_response())
    }

    /// Open a deal for every `contact.creation` event. Failures are logged and
    /// never fail the delivery, so HubSpot does not retry the whole batch.
    async fn create_deals_for_new_contacts(&self, events: &[WebhookEvent]) -> usize {
        let new_contacts: Vec<i64> = events
            .iter()
            .filter(|e| e.is_contact_creation())
            .map(|e| e.object_id)
            .collect();
        if new_contacts.is_empty() {
            return 0;
        }

        let session = match self.token_service.valid_access_token().await {
            Ok(access_token) => CrmSession::new(access_token, self.crm.clone()),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping deal creation, portal not connected");
                return 0;
            }
        };

        let mut created = 0;
        for vid in new_contacts {
            match create_deal_for_contact(&session, vid).await {
                Ok(deal) => {
                    tracing::info!(vid, deal_id = deal.deal_id, "Deal created for new contact");
                    created += 1;
                }
                Err(e) => {
                    tracing::warn!(vid, error = %e, "Failed to create deal for new contact")
                }
            }
        }
        created
    }
}

async fn create_deal_for_contact(session: &CrmSession, vid: i64) -> AppResult<Deal> {
    let contact = session.get_contact(vid).await?;
    session.create_deal(&NewDeal::for_contact(&contact)).await
}
