//! The `Tool` trait implemented by every invocable action.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ToolDefinition, ToolResult};
use crate::domain::foundation::{ToolCallId, UserId, ValidationError};

/// Per-invocation context handed to a tool.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Caller identity, when the request carried one
    pub user_id: Option<UserId>,

    /// Id of the call being executed
    pub tool_call_id: ToolCallId,
}

impl ToolContext {
    /// Creates a context for the given call.
    pub fn new(tool_call_id: ToolCallId, user_id: Option<UserId>) -> Self {
        Self {
            user_id,
            tool_call_id,
        }
    }
}

/// A named, schema-validated unit of external action invocable by the model.
///
/// `execute` returns a [`ToolResult`] rather than a `Result`: implementations
/// recover their own failures (network errors, bad downstream payloads,
/// missing credentials) and report them through the envelope.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Schema and description presented to the model.
    fn definition(&self) -> &ToolDefinition;

    /// Registry key.
    fn name(&self) -> &str {
        self.definition().name()
    }

    /// Validates arguments before execution.
    fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        self.definition().validate_input(input)
    }

    /// Performs the action.
    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;
}

/// Decodes validated arguments into a typed input struct.
///
/// Schema validation runs first, so a failure here means the schema and the
/// struct disagree; it still resolves to an error envelope.
pub fn decode_input<T: DeserializeOwned>(input: Value) -> Result<T, ToolResult> {
    serde_json::from_value(input).map_err(|e| ToolResult::error(format!("Invalid tool input: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct QueryInput {
        query: String,
        #[serde(default)]
        max_results: Option<u32>,
    }

    #[test]
    fn decode_input_maps_fields() {
        let input: QueryInput = decode_input(json!({ "query": "coffee" })).unwrap();
        assert_eq!(input.query, "coffee");
        assert_eq!(input.max_results, None);
    }

    #[test]
    fn decode_input_failure_is_error_envelope() {
        let err = decode_input::<QueryInput>(json!({ "query": 5 })).unwrap_err();
        assert!(!err.is_success());
        assert!(err.message().starts_with("Invalid tool input"));
    }
}
