use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::contacts::PropertyValue;

/// Company properties requested for the companies page
pub const COMPANY_PROPERTIES: &[&str] = &["name", "domain"];

/// Page returned by `/companies/v2/companies/paged`
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyPage {
    #[serde(default)]
    pub companies: Vec<Company>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub company_id: i64,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl Company {
    pub fn property(&self, name: &str) -> &str {
        self.properties
            .get(name)
            .map(|p| p.value.as_str())
            .unwrap_or_default()
    }
}

/// Row of the companies page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyView {
    pub company_id: i64,
    pub name: String,
    pub domain: String,
}

impl From<&Company> for CompanyView {
    fn from(company: &Company) -> Self {
        Self {
            company_id: company.company_id,
            name: company.property("name").to_string(),
            domain: company.property("domain").to_string(),
        }
    }
}
