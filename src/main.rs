//! Launchdesk server binary.
//!
//! Loads configuration, wires adapters into the tool registry and chat
//! orchestrator, and serves the HTTP API until shutdown.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use launchdesk::adapters::ai::{OpenAIConfig, OpenAIProvider};
use launchdesk::adapters::document::PandocDeckRenderer;
use launchdesk::adapters::generation::HttpGenerationService;
use launchdesk::adapters::http::{app_router, AppState, HttpSettings};
use launchdesk::adapters::postgres::PostgresIntegrationReader;
use launchdesk::adapters::shopify::ShopifyClient;
use launchdesk::adapters::storage::{InMemoryIntegrationReader, LocalBlobStorage};
use launchdesk::adapters::tools::{build_registry, ToolDependencies};
use launchdesk::application::ChatOrchestrator;
use launchdesk::config::{AiConfig, AppConfig, ConfigError, DatabaseConfig, ValidationError};
use launchdesk::domain::foundation::DomainError;
use launchdesk::ports::{AIError, GenerationError, IntegrationReader, StoreError};

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("AI provider setup failed: {0}")]
    Ai(#[from] AIError),

    #[error("store client setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("generation client setup failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("tool registry setup failed: {0}")]
    Registry(#[from] DomainError),

    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    let chat_provider = Arc::new(OpenAIProvider::new(provider_config(
        &config.ai,
        &config.ai.chat_model,
    ))?);
    let tool_provider = Arc::new(OpenAIProvider::new(provider_config(
        &config.ai,
        config.ai.research_model(),
    ))?);

    let mut renderer = PandocDeckRenderer::new()
        .with_pdf_engine(config.export.pdf_engine.as_str())
        .with_pdf_timeout(config.export.timeout_secs);
    if let Some(path) = &config.export.pandoc_path {
        renderer = renderer.with_pandoc_path(path.as_str());
    }
    let renderer = Arc::new(renderer);
    let storage = Arc::new(LocalBlobStorage::new(
        config.storage.root.clone(),
        config.storage.bucket.as_str(),
        config.storage.public_base_url.as_str(),
    ));

    let registry = build_registry(ToolDependencies {
        provider: tool_provider,
        integrations: integration_reader(&config.database).await?,
        store: Arc::new(ShopifyClient::new(
            config.shopify.api_version.as_str(),
            config.shopify.request_timeout(),
        )?),
        generation: Arc::new(HttpGenerationService::new(
            config.generation.base_url.as_str(),
            config.generation.timeout(),
        )?),
        renderer: renderer.clone(),
        storage: storage.clone(),
        deck_prefix: config.storage.deck_prefix.clone(),
        product_page_size: config.shopify.product_page_size,
    })?;

    let orchestrator = ChatOrchestrator::new(chat_provider, Arc::new(registry), config.chat.max_steps);
    let state = AppState::new(orchestrator, renderer, storage, config.storage.deck_prefix.as_str());

    let settings = HttpSettings {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.cors_origins_list(),
        files_root: Some(config.storage.root.clone()),
    };
    let app = app_router(state, &settings);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        model = %config.ai.chat_model,
        max_steps = config.chat.max_steps,
        "launchdesk listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("launchdesk stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured filter.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

fn provider_config(ai: &AiConfig, model: &str) -> OpenAIConfig {
    let api_key = ai
        .api_key
        .as_ref()
        .map(|key| key.expose_secret().clone())
        .unwrap_or_default();

    OpenAIConfig::new(api_key)
        .with_model(model)
        .with_base_url(ai.base_url.as_str())
        .with_timeout(ai.timeout())
        .with_max_retries(ai.max_retries)
}

/// Postgres-backed credentials when a database is configured, otherwise an
/// empty in-memory store.
async fn integration_reader(
    database: &DatabaseConfig,
) -> Result<Arc<dyn IntegrationReader>, StartupError> {
    let Some(url) = database.url() else {
        warn!("No database configured; store integrations are held in memory");
        return Ok(Arc::new(InMemoryIntegrationReader::new()));
    };

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .max_lifetime(database.max_lifetime())
        .connect(url)
        .await?;

    info!("Connected to integration database");
    Ok(Arc::new(PostgresIntegrationReader::new(pool)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
