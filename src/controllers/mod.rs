pub mod companies;
pub mod contacts;
pub mod health;
pub mod oauth;
pub mod pages;
pub mod webhooks;
