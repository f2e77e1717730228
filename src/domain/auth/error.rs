use crate::error::AppError;

/// Outcome of a failed attempt to obtain a usable access token
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthServiceError {
    #[error("no refresh token available")]
    NotAuthenticated,
    #[error("refresh token rejected: {0}")]
    RefreshRejected(String),
    #[error("token refresh unavailable: {0}")]
    RefreshUnavailable(String),
    #[error("authorization code exchange failed: {0}")]
    Exchange(String),
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Exchange(msg) => AppError::Upstream(msg),
            other => AppError::Unauthenticated(other.to_string()),
        }
    }
}
