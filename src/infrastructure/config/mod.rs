use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HUBSPOT_AUTH_BASE_URL: &str = "https://app.hubspot.com";
pub const DEFAULT_HUBSPOT_API_BASE_URL: &str = "https://api.hubapi.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // HubSpot OAuth; absence is reported by the config middleware, not at startup
    pub hubspot_client_id: Option<String>,
    pub hubspot_client_secret: Option<String>,
    pub hubspot_scopes: String,
    pub redirect_base_url: String,
    pub hubspot_auth_base_url: String,
    pub hubspot_api_base_url: String,
    // Token persistence
    pub token_store: TokenStoreKind,
    pub token_store_path: PathBuf,
    pub database_url: Option<String>,
    // Refresh policy
    pub refresh_timeout_secs: u64,
    pub refresh_max_retries: u32,
    pub refresh_retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    File,
    Postgres,
    Memory,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let token_store = match env::var("TOKEN_STORE")
            .unwrap_or_else(|_| "file".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => TokenStoreKind::Postgres,
            "memory" => TokenStoreKind::Memory,
            _ => TokenStoreKind::File,
        };

        let database_url = non_empty_var("DATABASE_URL");
        if token_store == TokenStoreKind::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set when TOKEN_STORE=postgres".into());
        }

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            hubspot_client_id: non_empty_var("HUBSPOT_CLIENT_ID"),
            hubspot_client_secret: non_empty_var("HUBSPOT_CLIENT_SECRET"),
            hubspot_scopes: env::var("HUBSPOT_SCOPES").unwrap_or_else(|_| "contacts".to_string()),
            redirect_base_url: env::var("REDIRECT_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            hubspot_auth_base_url: env::var("HUBSPOT_AUTH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_HUBSPOT_AUTH_BASE_URL.to_string()),
            hubspot_api_base_url: env::var("HUBSPOT_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_HUBSPOT_API_BASE_URL.to_string()),
            token_store,
            token_store_path: env::var("TOKEN_STORE_PATH")
                .unwrap_or_else(|_| "storage/tokens.json".to_string())
                .into(),
            database_url,
            refresh_timeout_secs: env::var("REFRESH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            refresh_max_retries: env::var("REFRESH_MAX_RETRIES")
                .unwrap_or_else(|_| "2".to_string())
                .parse()?,
            refresh_retry_backoff_ms: env::var("REFRESH_RETRY_BACKOFF_MS")
                .unwrap_or_else(|_| "200".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Where HubSpot sends the user back after consent
    pub fn oauth_redirect_uri(&self) -> String {
        format!("{}/oauth-callback", self.redirect_base_url)
    }

    /// First missing credential, phrased for the error page
    pub fn missing_credentials_message(&self) -> Option<String> {
        if self.hubspot_client_id.is_none() {
            return Some("Please set HUBSPOT_CLIENT_ID env variable to proceed".to_string());
        }
        if self.hubspot_client_secret.is_none() {
            return Some("Please set HUBSPOT_CLIENT_SECRET env variable to proceed".to_string());
        }
        None
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs)
    }

    pub fn refresh_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.refresh_retry_backoff_ms)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
