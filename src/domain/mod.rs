pub mod auth;
pub mod companies;
pub mod contacts;
pub mod deals;
pub mod webhooks;
