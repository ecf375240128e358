//! Tool definition - schema and metadata for a tool.
//!
//! Defines the interface the language model sees for a tool, and validates
//! model-supplied arguments against the declared input schema.

use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ValidationError;

/// Definition of a tool that can be invoked by the model.
///
/// Contains the schema and documentation needed for:
/// - provider tool calling (OpenAI-compatible function format)
/// - argument validation before execution
///
/// # Examples
///
/// ```
/// use launchdesk::domain::tools::ToolDefinition;
///
/// let definition = ToolDefinition::new(
///     "deleteProduct",
///     "Delete a product from the connected Shopify store",
///     serde_json::json!({
///         "type": "object",
///         "required": ["product_id"],
///         "properties": {
///             "product_id": { "type": "string" },
///             "product_title": { "type": "string" }
///         }
///     }),
/// );
/// assert!(definition
///     .validate_input(&serde_json::json!({ "product_id": "42" }))
///     .is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "marketSearch")
    name: String,

    /// Human-readable description for the model
    description: String,

    /// JSON Schema for the arguments
    input_schema: Value,

    #[serde(skip)]
    compiled: CompiledSchema,
}

impl PartialEq for ToolDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.input_schema == other.input_schema
    }
}

impl Eq for ToolDefinition {}

/// Validator built from the input schema on first use and shared by clones.
/// A compile failure is kept as its message.
#[derive(Clone, Default)]
struct CompiledSchema(Arc<OnceCell<Result<Validator, String>>>);

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledSchema")
            .field(&self.0.get().map(|compiled| compiled.is_ok()))
            .finish()
    }
}

impl ToolDefinition {
    /// Creates a new tool definition.
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            compiled: CompiledSchema::default(),
        }
    }

    /// Creates a definition for a tool that takes no arguments.
    pub fn without_input(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            description,
            serde_json::json!({ "type": "object", "properties": {} }),
        )
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the input schema.
    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Checks arguments against the input schema.
    ///
    /// A schema that itself fails to compile is reported as an invalid
    /// format error on the tool name, so a broken definition cannot
    /// silently accept anything.
    pub fn validate_input(&self, input: &Value) -> Result<(), ValidationError> {
        let validator = self
            .compiled
            .0
            .get_or_init(|| jsonschema::validator_for(&self.input_schema).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| {
                ValidationError::invalid_format(self.name.clone(), format!("invalid input schema: {}", e))
            })?;

        if validator.is_valid(input) {
            return Ok(());
        }

        let violations: Vec<String> = validator.iter_errors(input).map(|e| e.to_string()).collect();
        Err(ValidationError::schema(violations))
    }

    /// Converts to OpenAI-compatible function tool format.
    pub fn to_openai_format(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.input_schema
            }
        })
    }
}
