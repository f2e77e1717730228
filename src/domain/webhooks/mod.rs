pub mod signature;

pub use signature::{compute_signature, verify_signature, SIGNATURE_HEADER};

use serde::{Deserialize, Serialize};

/// One entry of a HubSpot webhook batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub event_id: i64,
    pub subscription_id: i64,
    pub portal_id: i64,
    pub app_id: i64,
    pub occurred_at: i64,
    pub subscription_type: String,
    #[serde(default)]
    pub attempt_number: i32,
    pub object_id: i64,
    #[serde(default)]
    pub change_flag: Option<String>,
    #[serde(default)]
    pub change_source: Option<String>,
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub property_value: Option<String>,
}

pub const CONTACT_CREATION: &str = "contact.creation";

impl WebhookEvent {
    pub fn is_contact_creation(&self) -> bool {
        self.subscription_type == CONTACT_CREATION
    }

    /// Last segment of the subscription type, e.g. `creation` for `contact.creation`
    pub fn event_name(&self) -> &str {
        self.subscription_type
            .rsplit('.')
            .next()
            .unwrap_or(&self.subscription_type)
    }
}

/// Acknowledgement returned to HubSpot
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookReceipt {
    pub received: usize,
    pub deals_created: usize,
}
