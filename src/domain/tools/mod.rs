//! Tools - the units of external action the model can invoke.
//!
//! - [`ToolDefinition`]: name, description and input schema
//! - [`Tool`]: trait every tool implements
//! - [`ToolResult`]: the `{success, status, message, ...payload}` envelope
//! - [`ToolRegistry`]: name lookup plus the validated execution boundary

mod tool;
mod tool_call;
mod tool_definition;
mod tool_registry;
mod tool_result;

pub use tool::{decode_input, Tool, ToolContext};
pub use tool_call::ToolCall;
pub use tool_definition::ToolDefinition;
pub use tool_registry::{ToolAvailability, ToolOutcome, ToolRegistry, ToolRejection};
pub use tool_result::{ToolResult, ToolStatus};
