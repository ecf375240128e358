//! Tool call value object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ToolCallId;

/// A request from the model to invoke a tool.
///
/// Arguments are kept as raw JSON until the registry validates them
/// against the tool's input schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id
    id: ToolCallId,

    /// Name of the tool to invoke
    name: String,

    /// Arguments (JSON object)
    input: Value,
}

impl ToolCall {
    /// Creates a new tool call.
    pub fn new(id: ToolCallId, name: impl Into<String>, input: Value) -> Self {
        Self {
            id,
            name: name.into(),
            input,
        }
    }

    /// Returns the call id.
    pub fn id(&self) -> &ToolCallId {
        &self.id
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arguments.
    pub fn input(&self) -> &Value {
        &self.input
    }
}
