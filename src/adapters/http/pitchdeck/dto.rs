//! Request and response bodies of the pitch deck endpoints.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /api/pitchdeck/export` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub deck_id: Option<String>,
    /// Loosely shaped slides; normalized before rendering.
    #[serde(default)]
    pub slides: Option<Value>,
}

/// `POST /api/pitchdeck/upload` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub pdf_buffer: Option<Value>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub pdf_url: String,
}

/// Why an upload body could not be turned into bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfBufferError {
    Missing,
    Invalid(&'static str),
}

/// Decodes `pdfBuffer` into raw bytes.
///
/// Accepts a base64 string (optionally a `data:` URL), an array of byte
/// values, or a serialized Node buffer (`{"type":"Buffer","data":[...]}`).
pub fn decode_pdf_buffer(value: &Value) -> Result<Vec<u8>, PdfBufferError> {
    match value {
        Value::Null => Err(PdfBufferError::Missing),
        Value::String(encoded) => {
            let encoded = encoded.trim();
            if encoded.is_empty() {
                return Err(PdfBufferError::Missing);
            }
            let payload = match encoded.strip_prefix("data:") {
                Some(url) => url
                    .split_once(',')
                    .map(|(_, data)| data)
                    .ok_or(PdfBufferError::Invalid("Invalid data URL"))?,
                None => encoded,
            };
            STANDARD
                .decode(payload)
                .map_err(|_| PdfBufferError::Invalid("Invalid base64 in pdfBuffer"))
        }
        Value::Array(items) => bytes_from_array(items),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => bytes_from_array(items),
            _ => Err(PdfBufferError::Invalid("Unsupported pdfBuffer format")),
        },
        _ => Err(PdfBufferError::Invalid("Unsupported pdfBuffer format")),
    }
}

fn bytes_from_array(items: &[Value]) -> Result<Vec<u8>, PdfBufferError> {
    if items.is_empty() {
        return Err(PdfBufferError::Missing);
    }
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|byte| u8::try_from(byte).ok())
                .ok_or(PdfBufferError::Invalid("pdfBuffer must contain byte values"))
        })
        .collect()
}
