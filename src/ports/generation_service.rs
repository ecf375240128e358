//! Generation Service Port - the document and brand generation backend.
//!
//! Legal documents, branding assets and branding videos are produced by a
//! separate HTTP service; its payloads are passed through mostly as-is.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Port for the generation backend.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generates legal documents for an idea.
    async fn generate_legal_docs(&self, idea: &str) -> Result<LegalDocsPayload, GenerationError>;

    /// Generates branding assets (name, tagline, logo) for an idea.
    async fn generate_branding(&self, idea: &str) -> Result<Value, GenerationError>;

    /// Generates a promotional video for an idea.
    async fn generate_branding_video(&self, idea: &str) -> Result<VideoPayload, GenerationError>;
}

/// Raw legal documents response.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalDocsPayload {
    /// Model-written documents, usually a JSON array embedded in text.
    pub docs: Value,
    /// Rendered PDFs, passed through to the client.
    pub pdfs: Value,
}

/// Branding video response.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoPayload {
    pub video: bool,
    pub video_url: Option<String>,
}

/// Generation backend errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Non-success status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected response body.
    #[error("unexpected response: {0}")]
    Parse(String),
}
