//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// OpenAI-compatible chat completions provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the completions endpoint
    pub api_key: Option<Secret<String>>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used by the chat orchestrator
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used inside research and generation tools; defaults to `chat_model`
    pub research_model: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Model for tool-internal calls
    pub fn research_model(&self) -> &str {
        self.research_model.as_deref().unwrap_or(&self.chat_model)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate AI configuration
    ///
    /// The key may only be absent in the test environment.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if environment != Environment::Test && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl {
                field: "ai.base_url",
                value: self.base_url.clone(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            research_model: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_chat_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.chat_model, "gemini-2.5-flash");
        assert_eq!(config.research_model(), "gemini-2.5-flash");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_research_model_override() {
        let config = AiConfig {
            research_model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        assert_eq!(config.research_model(), "gpt-4o");
    }

    #[test]
    fn test_validation_requires_key_outside_test() {
        let config = AiConfig::default();
        assert_eq!(
            config.validate(Environment::Development),
            Err(ValidationError::MissingRequired("AI__API_KEY"))
        );
        assert!(config.validate(Environment::Test).is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_key_and_bad_url() {
        let config = AiConfig {
            api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(config.validate(Environment::Production).is_err());

        let config = AiConfig {
            api_key: Some(Secret::new("key".to_string())),
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(Environment::Production),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }
}
