//! PDF export configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Pandoc-based PDF export
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Path to the pandoc binary; looked up on PATH when unset
    pub pandoc_path: Option<String>,

    /// PDF engine passed to pandoc
    #[serde(default = "default_pdf_engine")]
    pub pdf_engine: String,

    /// Conversion timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ExportConfig {
    /// Get conversion timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pdf_engine.trim().is_empty() {
            return Err(ValidationError::MissingRequired("EXPORT__PDF_ENGINE"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pandoc_path: None,
            pdf_engine: default_pdf_engine(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_pdf_engine() -> String {
    "wkhtmltopdf".to_string()
}

fn default_timeout() -> u64 {
    60
}
