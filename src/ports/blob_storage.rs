//! Blob Storage Port - bucket-style file storage for generated artifacts.
//!
//! Generated pitch deck PDFs are uploaded here and linked from chat
//! responses by their public URL.

use async_trait::async_trait;
use thiserror::Error;

/// Port for storing binary files under a bucket-relative key.
///
/// # Contract
///
/// Implementations must:
/// - Overwrite an existing object at the same key (upsert)
/// - Write atomically (no partial content visible on failure)
/// - Reject keys that escape the bucket (`..`, absolute paths)
/// - Return a URL at which the object can be fetched
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores `bytes` at `key`, replacing any previous object.
    async fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<StoredBlob, StorageError>;

    /// Public URL for a key, whether or not it exists yet.
    fn public_url(&self, key: &str) -> String;
}

/// Metadata of a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Bucket-relative key.
    pub key: String,
    /// URL at which the object is served.
    pub public_url: String,
    /// Object size in bytes.
    pub size_bytes: u64,
    /// Hex-encoded SHA-256 of the content.
    pub checksum: String,
}

/// Errors from blob storage operations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The key is empty or escapes the bucket.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Storage backend refused the upload.
    #[error("Upload rejected: {0}")]
    Rejected(String),
}

impl StorageError {
    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey(key.into())
    }

    /// Creates an I/O error.
    pub fn io(reason: impl Into<String>) -> Self {
        Self::IoError(reason.into())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
