pub mod hubspot;

pub use hubspot::HubSpotCrmClient;

use crate::domain::companies::Company;
use crate::domain::contacts::{Contact, ContactPropertyInput, ContactUpsert};
use crate::domain::deals::{Deal, NewDeal};
use crate::error::AppResult;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// The CRM calls the gateway makes on behalf of the connected portal
#[async_trait]
pub trait CrmApi: Send + Sync {
    async fn list_contacts(&self, access_token: &str, count: u32) -> AppResult<Vec<Contact>>;

    /// Contacts matching `query` by email, name or company
    async fn search_contacts(&self, access_token: &str, query: &str) -> AppResult<Vec<Contact>>;

    async fn get_contact(&self, access_token: &str, vid: i64) -> AppResult<Contact>;

    /// Create the contact owning `email`, or update it when it already exists
    async fn create_or_update_contact(
        &self,
        access_token: &str,
        email: &str,
        properties: &[ContactPropertyInput],
    ) -> AppResult<ContactUpsert>;

    async fn list_companies(
        &self,
        access_token: &str,
        properties: &[&str],
    ) -> AppResult<Vec<Company>>;

    async fn create_deal(&self, access_token: &str, deal: &NewDeal) -> AppResult<Deal>;
}

/// Per-request CRM client, built around an access token that was valid when
/// the request entered the pipeline
#[derive(Clone)]
pub struct CrmSession {
    access_token: String,
    crm: Arc<dyn CrmApi>,
}

impl CrmSession {
    pub fn new(access_token: String, crm: Arc<dyn CrmApi>) -> Self {
        Self { access_token, crm }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub async fn list_contacts(&self, count: u32) -> AppResult<Vec<Contact>> {
        self.crm.list_contacts(&self.access_token, count).await
    }

    pub async fn search_contacts(&self, query: &str) -> AppResult<Vec<Contact>> {
        self.crm.search_contacts(&self.access_token, query).await
    }

    pub async fn get_contact(&self, vid: i64) -> AppResult<Contact> {
        self.crm.get_contact(&self.access_token, vid).await
    }

    pub async fn create_or_update_contact(
        &self,
        email: &str,
        properties: &[ContactPropertyInput],
    ) -> AppResult<ContactUpsert> {
        self.crm
            .create_or_update_contact(&self.access_token, email, properties)
            .await
    }

    pub async fn list_companies(&self, properties: &[&str]) -> AppResult<Vec<Company>> {
        self.crm.list_companies(&self.access_token, properties).await
    }

    pub async fn create_deal(&self, deal: &NewDeal) -> AppResult<Deal> {
        self.crm.create_deal(&self.access_token, deal).await
    }
}

impl fmt::Debug for CrmSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrmSession")
            .field("access_token", &"<redacted>")
            .finish()
    }
}
