//! Tool Registry - process-wide mapping from tool name to implementation.
//!
//! Built once at startup and shared read-only across requests. Besides lookup
//! it owns the execution boundary: unknown names, calls outside the step's
//! allow-list and schema violations are rejected before a tool runs, and a
//! panicking tool is converted into an error envelope.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use thiserror::Error;

use super::{Tool, ToolCall, ToolContext, ToolDefinition, ToolResult};
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Which tools the model may call in the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAvailability {
    /// Every registered tool.
    All,
    /// Exactly one tool.
    Only(String),
}

impl ToolAvailability {
    /// Returns true if the named tool may be called.
    pub fn allows(&self, name: &str) -> bool {
        match self {
            ToolAvailability::All => true,
            ToolAvailability::Only(allowed) => allowed == name,
        }
    }
}

/// Why a call was refused before execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolRejection {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool {tool} is not available in this step (allowed: {allowed})")]
    NotAllowed { tool: String, allowed: String },

    #[error("Invalid arguments for {tool}: {error}")]
    InvalidInput { tool: String, error: ValidationError },
}

/// Result of routing one call through the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// The tool ran and produced an envelope (successful or not).
    Completed(ToolResult),
    /// The call never reached the tool.
    Rejected(ToolRejection),
}

impl ToolOutcome {
    /// JSON fed back to the model as the tool result.
    pub fn to_model_value(&self) -> Value {
        match self {
            ToolOutcome::Completed(result) => result.to_value(),
            ToolOutcome::Rejected(rejection) => serde_json::json!({
                "error": "invalid_call",
                "reason": rejection.to_string(),
            }),
        }
    }
}

/// Central registry of invocable tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    /// Registered tools by name
    tools: HashMap<String, Arc<dyn Tool>>,

    /// Names in registration order, for stable tool lists
    order: Vec<String>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.order).finish()
    }
}

impl ToolRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under its definition name.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTool` if the name is already taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), DomainError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(DomainError::new(
                ErrorCode::DuplicateTool,
                format!("Tool already registered: {}", name),
            ));
        }
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Gets a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Checks if a tool exists.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool names in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Gets the total number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Definitions the model may see under the given availability.
    pub fn definitions(&self, availability: &ToolAvailability) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter(|name| availability.allows(name))
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition().clone())
            .collect()
    }

    /// Resolves and validates a call without running it.
    pub fn prepare(
        &self,
        call: &ToolCall,
        availability: &ToolAvailability,
    ) -> Result<Arc<dyn Tool>, ToolRejection> {
        let tool = self
            .tools
            .get(call.name())
            .ok_or_else(|| ToolRejection::UnknownTool(call.name().to_string()))?;

        if let ToolAvailability::Only(allowed) = availability {
            if allowed != call.name() {
                return Err(ToolRejection::NotAllowed {
                    tool: call.name().to_string(),
                    allowed: allowed.clone(),
                });
            }
        }

        tool.validate(call.input())
            .map_err(|error| ToolRejection::InvalidInput {
                tool: call.name().to_string(),
                error,
            })?;

        Ok(Arc::clone(tool))
    }

    /// Validates and executes a call.
    ///
    /// Never fails: rejections and panics are folded into the outcome.
    pub async fn invoke(
        &self,
        call: &ToolCall,
        availability: &ToolAvailability,
        ctx: &ToolContext,
    ) -> ToolOutcome {
        let tool = match self.prepare(call, availability) {
            Ok(tool) => tool,
            Err(rejection) => {
                tracing::warn!(
                    tool = %call.name(),
                    tool_call_id = %call.id(),
                    reason = %rejection,
                    "Tool call rejected"
                );
                return ToolOutcome::Rejected(rejection);
            }
        };

        let execution = tool.execute(call.input().clone(), ctx);
        match AssertUnwindSafe(execution).catch_unwind().await {
            Ok(result) => ToolOutcome::Completed(result),
            Err(_) => {
                tracing::error!(
                    tool = %call.name(),
                    tool_call_id = %call.id(),
                    "Tool panicked during execution"
                );
                ToolOutcome::Completed(ToolResult::error(format!(
                    "{} failed unexpectedly. Please try again.",
                    call.name()
                )))
            }
        }
    }
}
