use serde::{Deserialize, Serialize};

use crate::domain::contacts::Contact;

const DEAL_NAME_SUFFIX: &str = " 様のご契約";

/// Body of `POST /deals/v1/deal`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeal {
    pub associations: DealAssociations,
    pub properties: Vec<DealProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealAssociations {
    pub associated_vids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealProperty {
    pub name: String,
    pub value: String,
}

impl NewDeal {
    /// Deal opened for a freshly created contact, named "<last> <first> 様のご契約"
    pub fn for_contact(contact: &Contact) -> Self {
        let deal_name = format!(
            "{} {}{}",
            contact.property("lastname"),
            contact.property("firstname"),
            DEAL_NAME_SUFFIX
        );

        Self {
            associations: DealAssociations {
                associated_vids: vec![contact.vid],
            },
            properties: vec![DealProperty {
                name: "dealname".to_string(),
                value: deal_name,
            }],
        }
    }

    pub fn deal_name(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == "dealname")
            .map(|p| p.value.as_str())
    }
}

/// Deal as answered by the deals API; only the id is used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub deal_id: i64,
}
