//! Blob storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Local blob storage for uploaded files
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding all buckets; served under `/files`
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Bucket receiving uploads
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Key prefix for pitch deck PDFs
    #[serde(default = "default_deck_prefix")]
    pub deck_prefix: String,

    /// Public URL the storage root is reachable at
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bucket.trim().is_empty() || self.bucket.contains('/') {
            return Err(ValidationError::MissingRequired("STORAGE__BUCKET"));
        }
        if self.deck_prefix.trim_matches('/').is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DECK_PREFIX"));
        }
        if !self.public_base_url.starts_with("http://") && !self.public_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidUrl {
                field: "storage.public_base_url",
                value: self.public_base_url.clone(),
            });
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            bucket: default_bucket(),
            deck_prefix: default_deck_prefix(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_bucket() -> String {
    "product_images".to_string()
}

fn default_deck_prefix() -> String {
    "pitch-decks".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/files".to_string()
}
