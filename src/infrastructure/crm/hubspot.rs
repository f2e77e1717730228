use super::CrmApi;
use crate::domain::companies::{Company, CompanyPage};
use crate::domain::contacts::{Contact, ContactList, ContactPropertyInput, ContactUpsert};
use crate::domain::deals::{Deal, NewDeal};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;

const CONTACTS_PATH: &str = "/contacts/v1/lists/all/contacts/all";
const CONTACT_SEARCH_PATH: &str = "/contacts/v1/search/query";
const COMPANIES_PATH: &str = "/companies/v2/companies/paged";
const DEALS_PATH: &str = "/deals/v1/deal";

pub struct HubSpotCrmClient {
    api_base_url: String,
    http_client: reqwest::Client,
}

impl HubSpotCrmClient {
    pub fn new(api_base_url: String) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Send an authenticated request and decode a successful JSON answer;
    /// `action` names the call in error messages
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        access_token: &str,
        action: &str,
    ) -> AppResult<T> {
        let response = request
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to {}: {}", action, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<serde_json::Value>(&error_text)
                .ok()
                .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or(error_text);
            return Err(AppError::Upstream(format!(
                "Failed to {} ({}): {}",
                action,
                status.as_u16(),
                message
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse answer to {}: {}", action, e)))
    }
}

#[async_trait]
impl CrmApi for HubSpotCrmClient {
    async fn list_contacts(&self, access_token: &str, count: u32) -> AppResult<Vec<Contact>> {
        tracing::debug!(count, "Retrieving contacts");

        let request = self
            .http_client
            .get(self.url(CONTACTS_PATH))
            .query(&[("count", count)]);
        let list: ContactList = self.send(request, access_token, "get contacts").await?;

        Ok(list.contacts)
    }

    async fn search_contacts(&self, access_token: &str, query: &str) -> AppResult<Vec<Contact>> {
        tracing::debug!(query, "Searching contacts");

        let request = self
            .http_client
            .get(self.url(CONTACT_SEARCH_PATH))
            .query(&[("q", query)]);
        let list: ContactList = self.send(request, access_token, "search contacts").await?;

        Ok(list.contacts)
    }

    async fn get_contact(&self, access_token: &str, vid: i64) -> AppResult<Contact> {
        tracing::debug!(vid, "Retrieving contact");

        let request = self
            .http_client
            .get(self.url(&format!("/contacts/v1/contact/vid/{}/profile", vid)));
        self.send(request, access_token, "get contact").await
    }

    async fn create_or_update_contact(
        &self,
        access_token: &str,
        email: &str,
        properties: &[ContactPropertyInput],
    ) -> AppResult<ContactUpsert> {
        tracing::debug!(properties = properties.len(), "Creating or updating contact");

        let request = self
            .http_client
            .post(self.url(&format!(
                "/contacts/v1/contact/createOrUpdate/email/{}",
                urlencoding::encode(email)
            )))
            .json(&json!({ "properties": properties }));
        self.send(request, access_token, "create or update contact")
            .await
    }

    async fn list_companies(
        &self,
        access_token: &str,
        properties: &[&str],
    ) -> AppResult<Vec<Company>> {
        tracing::debug!(?properties, "Retrieving companies");

        let query: Vec<(&str, &str)> = properties.iter().map(|p| ("properties", *p)).collect();
        let request = self
            .http_client
            .get(self.url(COMPANIES_PATH))
            .query(&query);
        let page: CompanyPage = self.send(request, access_token, "get companies").await?;

        Ok(page.companies)
    }

    async fn create_deal(&self, access_token: &str, deal: &NewDeal) -> AppResult<Deal> {
        tracing::debug!(deal_name = ?deal.deal_name(), "Creating deal");

        let request = self.http_client.post(self.url(DEALS_PATH)).json(deal);
        self.send(request, access_token, "create deal").await
    }
}
