//! HTTP implementation of GenerationService.
//!
//! Calls the local generation backend:
//! - `POST /api/legal/generate` with `{idea}`
//! - `POST /api/brand/generate` with `{idea_string}`
//! - `POST /api/brand/generate-video` with `{idea_string}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};

use crate::ports::{GenerationError, GenerationService, LegalDocsPayload, VideoPayload};

/// Client for the generation backend.
#[derive(Debug, Clone)]
pub struct HttpGenerationService {
    client: Client,
    base_url: String,
}

impl HttpGenerationService {
    /// Creates a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, GenerationError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Calling generation service");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GenerationError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))
    }
}

fn take_field(data: &mut Value, key: &str) -> Value {
    data.get_mut(key).map(Value::take).unwrap_or(Value::Null)
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate_legal_docs(&self, idea: &str) -> Result<LegalDocsPayload, GenerationError> {
        let mut data = self.post("/api/legal/generate", &json!({ "idea": idea })).await?;

        let pdfs = match take_field(&mut data, "pdfs") {
            Value::Null => json!([]),
            pdfs => pdfs,
        };

        Ok(LegalDocsPayload {
            docs: take_field(&mut data, "docs"),
            pdfs,
        })
    }

    async fn generate_branding(&self, idea: &str) -> Result<Value, GenerationError> {
        let mut data = self
            .post("/api/brand/generate", &json!({ "idea_string": idea }))
            .await?;

        Ok(match take_field(&mut data, "branding") {
            Value::Null => json!({}),
            branding => branding,
        })
    }

    async fn generate_branding_video(&self, idea: &str) -> Result<VideoPayload, GenerationError> {
        let data = self
            .post("/api/brand/generate-video", &json!({ "idea_string": idea }))
            .await?;

        Ok(VideoPayload {
            video: data["video"].as_bool() == Some(true),
            video_url: data["video_url"].as_str().map(str::to_string),
        })
    }
}
