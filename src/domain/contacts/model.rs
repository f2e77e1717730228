use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Page of contacts as returned by `/contacts/v1/lists/all/contacts/all`
/// and `/contacts/v1/search/query`
#[derive(Debug, Clone, Deserialize)]
pub struct ContactList {
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub vid: i64,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyValue {
    #[serde(default)]
    pub value: String,
}

impl Contact {
    pub fn property(&self, name: &str) -> &str {
        self.properties
            .get(name)
            .map(|p| p.value.as_str())
            .unwrap_or_default()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.property("firstname"), self.property("lastname"))
            .trim()
            .to_string()
    }
}

/// Row of the contacts page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactView {
    pub vid: i64,
    pub name: String,
    pub company_name: String,
}

impl From<&Contact> for ContactView {
    fn from(contact: &Contact) -> Self {
        Self {
            vid: contact.vid,
            name: contact.full_name(),
            company_name: contact.property("company").to_string(),
        }
    }
}

/// Every property of one contact, flattened to plain values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDetail {
    pub vid: i64,
    pub properties: BTreeMap<String, String>,
}

impl From<&Contact> for ContactDetail {
    fn from(contact: &Contact) -> Self {
        Self {
            vid: contact.vid,
            properties: contact
                .properties
                .iter()
                .map(|(name, p)| (name.clone(), p.value.clone()))
                .collect(),
        }
    }
}

/// One `{property, value}` entry of a createOrUpdate body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPropertyInput {
    pub property: String,
    pub value: String,
}

/// Answer of `/contacts/v1/contact/createOrUpdate/email/{email}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpsert {
    pub vid: i64,
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Debug, Deserialize)]
pub struct ContactSearchParams {
    pub search: Option<String>,
}
