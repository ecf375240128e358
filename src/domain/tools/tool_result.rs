//! Tool result envelope.
//!
//! Every tool resolves to this shape on every path. Rendering code relies
//! on `success`, `status` and `message` being present alongside whatever
//! domain payload the tool attaches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the envelope; payload entries may not shadow them.
const RESERVED_KEYS: [&str; 3] = ["success", "status", "message"];

/// Coarse outcome marker carried next to `success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Done,
    Error,
}

/// Uniform result of a tool execution: `{success, status, message, ...payload}`.
///
/// # Examples
///
/// ```
/// use launchdesk::domain::tools::ToolResult;
///
/// let result = ToolResult::done("Here is the link to your store")
///     .with("store_url", "https://example.myshopify.com");
/// let json = result.to_value();
/// assert_eq!(json["success"], true);
/// assert_eq!(json["status"], "done");
/// assert_eq!(json["store_url"], "https://example.myshopify.com");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    success: bool,
    status: ToolStatus,
    message: String,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl ToolResult {
    /// Successful result.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            status: ToolStatus::Done,
            message: message.into(),
            payload: Map::new(),
        }
    }

    /// Failed result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status: ToolStatus::Error,
            message: message.into(),
            payload: Map::new(),
        }
    }

    /// Result whose success flag is decided at runtime; status follows the flag.
    pub fn with_outcome(success: bool, message: impl Into<String>) -> Self {
        if success {
            Self::done(message)
        } else {
            Self::error(message)
        }
    }

    /// Attaches a payload entry. Reserved envelope keys are ignored.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        if RESERVED_KEYS.contains(&key) {
            return self;
        }
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.payload.insert(key.to_string(), value);
        self
    }

    /// Returns true if the tool reported success.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the status marker.
    pub fn status(&self) -> ToolStatus {
        self.status
    }

    /// Returns the user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns a payload entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Returns the full payload without envelope keys.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Flattens the envelope into a single JSON object.
    pub fn to_value(&self) -> Value {
        let mut object = self.payload.clone();
        object.insert("success".to_string(), Value::Bool(self.success));
        object.insert(
            "status".to_string(),
            Value::String(
                match self.status {
                    ToolStatus::Done => "done",
                    ToolStatus::Error => "error",
                }
                .to_string(),
            ),
        );
        object.insert("message".to_string(), Value::String(self.message.clone()));
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn done_sets_success_and_status() {
        let result = ToolResult::done("ok");
        assert!(result.is_success());
        assert_eq!(result.status(), ToolStatus::Done);
        assert_eq!(result.message(), "ok");
    }

    #[test]
    fn error_sets_failure_and_status() {
        let result = ToolResult::error("No active Shopify integration found.");
        assert!(!result.is_success());
        assert_eq!(result.status(), ToolStatus::Error);
    }

    #[test]
    fn payload_cannot_shadow_envelope_keys() {
        let result = ToolResult::error("boom")
            .with("success", true)
            .with("message", "fine")
            .with("status", "done");

        let json = result.to_value();
        assert_eq!(json["success"], false);
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn serializes_flat() {
        let result = ToolResult::done("Generated 2 legal documents")
            .with("docs", json!([{ "type": "nda" }, { "type": "tos" }]));

        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(serialized, result.to_value());
        assert_eq!(serialized["docs"][1]["type"], "tos");
    }

    #[test]
    fn deserializes_payload_from_flat_object() {
        let result: ToolResult = serde_json::from_value(json!({
            "success": true,
            "status": "done",
            "message": "ok",
            "phone_number": "+1 (224) 228 9860"
        }))
        .unwrap();

        assert_eq!(result.get("phone_number"), Some(&json!("+1 (224) 228 9860")));
        assert_eq!(result.payload().len(), 1);
    }

    proptest! {
        #[test]
        fn envelope_keys_always_present(
            success in any::<bool>(),
            message in ".*",
            keys in proptest::collection::vec("[a-z_]{1,12}", 0..6),
        ) {
            let mut result = ToolResult::with_outcome(success, message.clone());
            for key in &keys {
                result = result.with(key, key.len());
            }
            let json = result.to_value();
            prop_assert_eq!(json["success"].as_bool(), Some(success));
            prop_assert_eq!(json["message"].as_str(), Some(message.as_str()));
            prop_assert!(json["status"].is_string());
        }
    }
}
