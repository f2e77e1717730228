pub mod hubspot;
pub mod provider;

pub use hubspot::HubSpotOAuthClient;
pub use provider::{OAuthProvider, OAuthProviderError};
