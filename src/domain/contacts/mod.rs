pub mod model;

pub use model::{
    Contact, ContactDetail, ContactList, ContactPropertyInput, ContactSearchParams, ContactUpsert,
    ContactView, PropertyValue,
};

/// Contacts shown on the home page
pub const CONTACTS_COUNT: u32 = 10;
