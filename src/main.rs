use hubspot_oauth_gateway::controllers::{oauth::OAuthController, webhooks::WebhooksController};
use hubspot_oauth_gateway::domain::auth::{RefreshPolicy, SystemClock, TokenService};
use hubspot_oauth_gateway::infrastructure::config::{Config, LogFormat, TokenStoreKind};
use hubspot_oauth_gateway::infrastructure::crm::{CrmApi, HubSpotCrmClient};
use hubspot_oauth_gateway::infrastructure::db::{check_connection, create_pool, ensure_schema};
use hubspot_oauth_gateway::infrastructure::http::{build_router, start_http_server};
use hubspot_oauth_gateway::infrastructure::oauth::{HubSpotOAuthClient, OAuthProvider};
use hubspot_oauth_gateway::infrastructure::repositories::{
    FileTokenRepository, InMemoryTokenRepository, PgTokenRepository, TokenRepository,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting HubSpot OAuth gateway on {}:{}",
        config.host,
        config.port
    );

    if let Some(message) = config.missing_credentials_message() {
        tracing::warn!("{}; every page will show the error until it is set", message);
    }

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Token repository
    let token_repo = build_token_repository(&config).await?;
    tracing::info!(backend = token_repo.backend(), "Token repository ready");

    // 2. HubSpot clients
    let oauth_provider: Arc<dyn OAuthProvider> = Arc::new(HubSpotOAuthClient::new(
        config.hubspot_client_id.clone().unwrap_or_default(),
        config.hubspot_client_secret.clone().unwrap_or_default(),
        config.oauth_redirect_uri(),
        config.hubspot_scopes.clone(),
        config.hubspot_auth_base_url.clone(),
        config.hubspot_api_base_url.clone(),
    ));
    let crm: Arc<dyn CrmApi> = Arc::new(HubSpotCrmClient::new(
        config.hubspot_api_base_url.clone(),
    ));

    // 3. Token service, primed from the store
    let token_service = Arc::new(TokenService::new(
        token_repo,
        oauth_provider.clone(),
        Arc::new(SystemClock),
        RefreshPolicy {
            timeout: config.refresh_timeout(),
            max_retries: config.refresh_max_retries,
            backoff: config.refresh_retry_backoff(),
        },
    ));
    token_service.load().await;

    // 4. Controllers
    let oauth_controller = Arc::new(OAuthController::new(oauth_provider, token_service.clone()));
    let webhooks_controller = Arc::new(WebhooksController::new(
        config.hubspot_client_secret.clone().unwrap_or_default(),
        token_service.clone(),
        crm.clone(),
    ));

    let app = build_router(
        config.clone(),
        token_service,
        crm,
        oauth_controller,
        webhooks_controller,
    );

    start_http_server(config, app).await?;

    Ok(())
}

async fn build_token_repository(
    config: &Config,
) -> Result<Arc<dyn TokenRepository>, Box<dyn std::error::Error>> {
    let repo: Arc<dyn TokenRepository> = match config.token_store {
        TokenStoreKind::File => Arc::new(FileTokenRepository::new(config.token_store_path.clone())),
        TokenStoreKind::Memory => Arc::new(InMemoryTokenRepository::new()),
        TokenStoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL must be set when TOKEN_STORE=postgres")?;

            let pool = create_pool(database_url).await?;
            tracing::info!("Database connection pool created");

            check_connection(&pool).await?;
            tracing::info!("Database connection verified");

            ensure_schema(&pool).await?;
            Arc::new(PgTokenRepository::new(Arc::new(pool)))
        }
    };

    Ok(repo)
}

fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hubspot_oauth_gateway=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
