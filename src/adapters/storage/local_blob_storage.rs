//! Local Filesystem Blob Storage - Implementation of BlobStorage.
//!
//! Stores objects under `{root}/{bucket}/{key}` and serves them from
//! `{public_base_url}/{bucket}/{key}`. Uses atomic writes and SHA-256
//! checksums.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::{BlobStorage, StorageError, StoredBlob};

/// Maximum object size allowed (25 MB).
const MAX_OBJECT_SIZE_BYTES: usize = 25 * 1024 * 1024;

/// Local filesystem blob storage.
///
/// # Directory Structure
///
/// ```text
/// {root}/
/// └── product_images/
///     └── pitch-decks/
///         └── pitch-deck-deck_1718000000000_abc123def.pdf
/// ```
///
/// # Atomic Writes
///
/// Content is written to `{key}.tmp`, synced, then renamed over the final
/// path, so readers never observe a partial object.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
}

impl LocalBlobStorage {
    /// Creates a storage rooted at `root`, writing into `bucket`.
    pub fn new(
        root: impl Into<PathBuf>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory served as the public file root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a key to its path, rejecting keys that escape the bucket.
    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.trim().is_empty() || key.contains('\\') {
            return Err(StorageError::invalid_key(key));
        }

        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(StorageError::invalid_key(key));
        }

        Ok(self.root.join(&self.bucket).join(relative))
    }

    /// Computes SHA-256 checksum of the given content.
    fn compute_checksum(content: &[u8]) -> String {
        format!("{:x}", Sha256::digest(content))
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn upload(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredBlob, StorageError> {
        if bytes.len() > MAX_OBJECT_SIZE_BYTES {
            return Err(StorageError::Rejected(format!(
                "object of {} bytes exceeds the {} byte limit",
                bytes.len(),
                MAX_OBJECT_SIZE_BYTES
            )));
        }

        let final_path = self.object_path(key)?;
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut temp_name = final_path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(bytes).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::io(format!(
                "Failed to sync temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })?;

        tracing::info!(
            key = %key,
            content_type = %content_type,
            size_bytes = bytes.len(),
            "Stored object"
        );

        Ok(StoredBlob {
            key: key.to_string(),
            public_url: self.public_url(key),
            size_bytes: bytes.len() as u64,
            checksum: Self::compute_checksum(bytes),
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> LocalBlobStorage {
        LocalBlobStorage::new(dir.path(), "product_images", "http://localhost:8080/files/")
    }

    #[tokio::test]
    async fn upload_writes_file_and_returns_public_url() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let blob = storage
            .upload("pitch-decks/pitch-deck-deck_1.pdf", b"%PDF-1.4", "application/pdf")
            .await
            .unwrap();

        assert_eq!(
            blob.public_url,
            "http://localhost:8080/files/product_images/pitch-decks/pitch-deck-deck_1.pdf"
        );
        assert_eq!(blob.size_bytes, 8);
        let on_disk = std::fs::read(
            dir.path()
                .join("product_images/pitch-decks/pitch-deck-deck_1.pdf"),
        )
        .unwrap();
        assert_eq!(on_disk, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn upload_overwrites_existing_object() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        storage.upload("a.pdf", b"first", "application/pdf").await.unwrap();
        let second = storage.upload("a.pdf", b"second", "application/pdf").await.unwrap();

        let on_disk = std::fs::read(dir.path().join("product_images/a.pdf")).unwrap();
        assert_eq!(on_disk, b"second");
        assert_eq!(second.checksum, LocalBlobStorage::compute_checksum(b"second"));
    }

    #[tokio::test]
    async fn upload_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        storage(&dir).upload("a.pdf", b"x", "application/pdf").await.unwrap();

        assert!(!dir.path().join("product_images/a.pdf.tmp").exists());
    }

    #[tokio::test]
    async fn rejects_keys_escaping_the_bucket() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        for key in ["../secret.pdf", "/etc/passwd", "", "a/../../b.pdf", "a\\b.pdf"] {
            let err = storage.upload(key, b"x", "application/pdf").await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key {:?}", key);
        }
    }

    #[test]
    fn checksum_is_hex_sha256() {
        assert_eq!(
            LocalBlobStorage::compute_checksum(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
