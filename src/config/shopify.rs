//! Shopify Admin API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Largest page the Admin API returns.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Shopify Admin API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyConfig {
    /// Admin API version segment, e.g. `2023-10`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Products listed per bulk delete
    #[serde(default = "default_page_size")]
    pub product_page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl ShopifyConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate Shopify configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_version.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SHOPIFY__API_VERSION"));
        }
        if self.product_page_size == 0 || self.product_page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidPageSize { max: MAX_PAGE_SIZE });
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            product_page_size: default_page_size(),
            request_timeout_secs: default_timeout(),
        }
    }
}

fn default_api_version() -> String {
    "2023-10".to_string()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_defaults() {
        let config = ShopifyConfig::default();
        assert_eq!(config.api_version, "2023-10");
        assert_eq!(config.product_page_size, 250);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_page_size_capped() {
        let config = ShopifyConfig {
            product_page_size: 251,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidPageSize { max: 250 })
        );
    }
}
