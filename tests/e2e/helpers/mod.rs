use chrono::{DateTime, Duration, TimeZone, Utc};
use hubspot_oauth_gateway::controllers::{oauth::OAuthController, webhooks::WebhooksController};
use hubspot_oauth_gateway::domain::auth::{RefreshPolicy, TokenService, TokenSet};
use hubspot_oauth_gateway::infrastructure::config::{
    Config, Environment, LogFormat, TokenStoreKind, DEFAULT_HUBSPOT_API_BASE_URL,
    DEFAULT_HUBSPOT_AUTH_BASE_URL,
};
use hubspot_oauth_gateway::infrastructure::http::build_router;
use hubspot_oauth_gateway::infrastructure::repositories::{InMemoryTokenRepository, TokenRepository};
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;


use api_client::TestClient;
use fakes::{FakeCrm, FakeOAuthProvider, ManualClock, RefreshOutcome};

pub const CLIENT_SECRET: &str = "test_client_secret";

/// Fixed start of time for every test
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Tokens issued `age` ago with a six hour lifetime
#[allow(dead_code)]
pub fn tokens_issued(access_token: &str, age: Duration) -> TokenSet {
    TokenSet {
        access_token: access_token.to_string(),
        refresh_token: "stored-refresh".to_string(),
        expires_in: 21600,
        updated_at: test_now() - age,
    }
}

/// Knobs for a test application
pub struct TestSetup {
    pub tokens: Option<TokenSet>,
    pub refresh_outcome: RefreshOutcome,
    pub refresh_delay: std::time::Duration,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Default for TestSetup {
    fn default() -> Self {
        Self {
            tokens: None,
            refresh_outcome: RefreshOutcome::Issue {
                access_token: "refreshed-access".to_string(),
            },
            refresh_delay: std::time::Duration::ZERO,
            client_id: Some("test_client_id".to_string()),
            client_secret: Some(CLIENT_SECRET.to_string()),
        }
    }
}

#[allow(dead_code)]
impl TestSetup {
    pub fn with_tokens(mut self, tokens: TokenSet) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn with_refresh_outcome(mut self, outcome: RefreshOutcome) -> Self {
        self.refresh_outcome = outcome;
        self
    }

    pub fn with_refresh_delay(mut self, delay: std::time::Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    pub fn without_client_id(mut self) -> Self {
        self.client_id = None;
        self
    }

    pub fn without_client_secret(mut self) -> Self {
        self.client_secret = None;
        self
    }
}

#[allow(dead_code)]
pub struct TestContext {
    pub client: TestClient,
    pub config: Config,
    pub repo: Arc<InMemoryTokenRepository>,
    pub provider: Arc<FakeOAuthProvider>,
    pub crm: Arc<FakeCrm>,
    pub clock: Arc<ManualClock>,
    pub token_service: Arc<TokenService>,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        TestContext::start(TestSetup::default())
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // The server task ends with the test runtime
        }
    }
}

#[allow(dead_code)]
impl TestContext {
    /// Boot the full router against fakes on an ephemeral port
    pub async fn start(setup: TestSetup) -> Self {
        let config = test_config(setup.client_id, setup.client_secret);

        let repo = Arc::new(match setup.tokens {
            Some(tokens) => InMemoryTokenRepository::with_tokens(tokens),
            None => InMemoryTokenRepository::new(),
        });
        let provider = Arc::new(FakeOAuthProvider::new(
            setup.refresh_outcome,
            setup.refresh_delay,
        ));
        let crm = Arc::new(FakeCrm::default());
        let clock = Arc::new(ManualClock::new(test_now()));

        let token_service = Arc::new(TokenService::new(
            repo.clone(),
            provider.clone(),
            clock.clone(),
            RefreshPolicy {
                timeout: std::time::Duration::from_secs(2),
                max_retries: 1,
                backoff: std::time::Duration::from_millis(10),
            },
        ));
        token_service.load().await;

        let config_arc = Arc::new(config.clone());
        let oauth_controller = Arc::new(OAuthController::new(
            provider.clone(),
            token_service.clone(),
        ));
        let webhooks_controller = Arc::new(WebhooksController::new(
            config.hubspot_client_secret.clone().unwrap_or_default(),
            token_service.clone(),
            crm.clone(),
        ));

        let app = build_router(
            config_arc,
            token_service.clone(),
            crm.clone(),
            oauth_controller,
            webhooks_controller,
        );

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: TestClient::new(&base_url),
            config,
            repo,
            provider,
            crm,
            clock,
            token_service,
        }
    }

    /// Tokens currently persisted in the store
    pub async fn stored_tokens(&self) -> Option<TokenSet> {
        self.repo.load().await.expect("memory store never fails")
    }
}

fn test_config(client_id: Option<String>, client_secret: Option<String>) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: Environment::Development,
        log_format: LogFormat::Pretty,
        hubspot_client_id: client_id,
        hubspot_client_secret: client_secret,
        hubspot_scopes: "contacts".to_string(),
        redirect_base_url: "http://localhost:3000".to_string(),
        hubspot_auth_base_url: DEFAULT_HUBSPOT_AUTH_BASE_URL.to_string(),
        hubspot_api_base_url: DEFAULT_HUBSPOT_API_BASE_URL.to_string(),
        token_store: TokenStoreKind::Memory,
        token_store_path: "storage/tokens.json".into(),
        database_url: None,
        refresh_timeout_secs: 2,
        refresh_max_retries: 1,
        refresh_retry_backoff_ms: 10,
    }
}
