//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `LAUNCHDESK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use launchdesk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod ai;
mod chat;
mod database;
mod error;
mod export;
mod generation;
mod server;
mod shopify;
mod storage;

pub use ai::AiConfig;
pub use chat::{ChatConfig, MAX_STEPS_LIMIT};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use export::ExportConfig;
pub use generation::GenerationConfig;
pub use server::{Environment, ServerConfig};
pub use shopify::{ShopifyConfig, MAX_PAGE_SIZE};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults; only `ai.api_key` is required outside the
/// test environment. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Model provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Chat orchestration (step ceiling)
    #[serde(default)]
    pub chat: ChatConfig,

    /// Optional PostgreSQL connection for stored integrations
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Shopify Admin API
    #[serde(default)]
    pub shopify: ShopifyConfig,

    /// Legal/branding/video generation service
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Blob storage for uploads and decks
    #[serde(default)]
    pub storage: StorageConfig,

    /// Pitch deck PDF export
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load and validate configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LAUNCHDESK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs and validates them
    ///
    /// # Environment Variable Format
    ///
    /// - `LAUNCHDESK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `LAUNCHDESK__AI__API_KEY=...` -> `ai.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed or fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LAUNCHDESK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate(self.server.environment)?;
        self.chat.validate()?;
        self.database.validate()?;
        self.shopify.validate()?;
        self.generation.validate()?;
        self.storage.validate()?;
        self.export.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
