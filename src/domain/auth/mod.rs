pub mod clock;
pub mod dto;
pub mod error;
pub mod model;
pub mod service;

pub use clock::{Clock, SystemClock};
pub use dto::{OAuthCallbackParams, OAuthTokenResponse, TokenStatusResponse};
pub use error::AuthServiceError;
pub use model::TokenSet;
pub use service::{RefreshPolicy, TokenService};
