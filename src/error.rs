use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/login";
pub const ERROR_PATH: &str = "/error";

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Configuration(String),

    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error body for the few endpoints that answer with JSON instead of a redirect
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    /// Status used for logging; most variants are rendered as redirects
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Configuration(_) | Self::Storage(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
        }
    }
}

/// Location of the error page carrying `message`
pub fn error_page_location(message: &str) -> String {
    format!("{}?msg={}", ERROR_PATH, urlencoding::encode(message))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            Self::Unauthenticated(ref reason) => {
                tracing::warn!(reason = %reason, "Redirecting to login");
                Redirect::to(LOGIN_PATH).into_response()
            }
            Self::Unauthorized(_) => {
                tracing::warn!(error = %self, status = %status.as_u16(), "Request rejected");
                (status, Json(self.to_response())).into_response()
            }
            _ => {
                tracing::error!(
                    error = %self,
                    status = %status.as_u16(),
                    "Request failed"
                );
                Redirect::to(&error_page_location(&self.to_string())).into_response()
            }
        }
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
