//! Chat messages as exchanged with the UI.
//!
//! Parts use the UI message wire shape: `{"type":"text","text":..}` for text,
//! `{"type":"tool-<name>","toolCallId":..,"state":..}` for tool invocations.
//! Part types this service does not interpret (`step-start`, `reasoning`, ...)
//! are kept verbatim so they round-trip to the client unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::domain::foundation::{StateMachine, ToolCallId, ValidationError};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Lifecycle of a tool invocation part.
///
/// Transitions only move forward:
/// `input-streaming → input-available → (output-available | output-error)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolPartState {
    InputStreaming,
    InputAvailable,
    OutputAvailable,
    OutputError,
}

impl StateMachine for ToolPartState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ToolPartState::*;
        matches!(
            (self, target),
            (InputStreaming, InputAvailable)
                | (InputStreaming, OutputError)
                | (InputAvailable, OutputAvailable)
                | (InputAvailable, OutputError)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ToolPartState::*;
        match self {
            InputStreaming => vec![InputAvailable, OutputError],
            InputAvailable => vec![OutputAvailable, OutputError],
            OutputAvailable | OutputError => vec![],
        }
    }
}

/// A tool invocation inside an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPart {
    pub tool_call_id: ToolCallId,
    pub tool_name: String,
    pub state: ToolPartState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

impl ToolPart {
    /// Starts a part whose input is still streaming.
    pub fn new(tool_call_id: ToolCallId, tool_name: impl Into<String>) -> Self {
        Self {
            tool_call_id,
            tool_name: tool_name.into(),
            state: ToolPartState::InputStreaming,
            input: None,
            output: None,
            error_text: None,
        }
    }

    /// Moves to a later state, rejecting regressions.
    pub fn advance(&mut self, target: ToolPartState) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(target)?;
        Ok(())
    }

    /// Records the complete input.
    pub fn accept_input(&mut self, input: Value) -> Result<(), ValidationError> {
        self.advance(ToolPartState::InputAvailable)?;
        self.input = Some(input);
        Ok(())
    }

    /// Records the tool output.
    pub fn complete(&mut self, output: Value) -> Result<(), ValidationError> {
        self.advance(ToolPartState::OutputAvailable)?;
        self.output = Some(output);
        Ok(())
    }

    /// Records a failure.
    pub fn fail(&mut self, error_text: impl Into<String>) -> Result<(), ValidationError> {
        self.advance(ToolPartState::OutputError)?;
        self.error_text = Some(error_text.into());
        Ok(())
    }

    /// True once an output or error is attached.
    pub fn is_resolved(&self) -> bool {
        self.state.is_terminal()
    }
}

/// One fragment of a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text { text: String },
    Tool(ToolPart),
    /// A part type this service passes through without interpreting.
    Other(Value),
}

/// Wire shape of a tool part: the tool name is carried in the type tag
/// (`tool-addProduct`) or, for `dynamic-tool`, in `toolName`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolPartWire {
    #[serde(rename = "type")]
    kind: String,
    tool_call_id: ToolCallId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
    state: ToolPartState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_text: Option<String>,
}

const DYNAMIC_TOOL: &str = "dynamic-tool";

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    fn from_value(value: Value) -> Result<Self, String> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| "message part is missing \"type\"".to_string())?
            .to_string();

        if kind == "text" {
            let text = value
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Ok(Part::Text { text });
        }

        if kind.starts_with("tool-") || kind == DYNAMIC_TOOL {
            let wire: ToolPartWire = serde_json::from_value(value).map_err(|e| e.to_string())?;
            let tool_name = match (wire.tool_name, kind.strip_prefix("tool-")) {
                (Some(name), _) => name,
                (None, Some(name)) => name.to_string(),
                (None, None) => return Err("dynamic-tool part is missing \"toolName\"".to_string()),
            };
            return Ok(Part::Tool(ToolPart {
                tool_call_id: wire.tool_call_id,
                tool_name,
                state: wire.state,
                input: wire.input,
                output: wire.output,
                error_text: wire.error_text,
            }));
        }

        Ok(Part::Other(value))
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Part::Text { text } => Ok(serde_json::json!({ "type": "text", "text": text })),
            Part::Tool(part) => serde_json::to_value(ToolPartWire {
                kind: format!("tool-{}", part.tool_name),
                tool_call_id: part.tool_call_id.clone(),
                tool_name: None,
                state: part.state,
                input: part.input.clone(),
                output: part.output.clone(),
                error_text: part.error_text.clone(),
            }),
            Part::Other(value) => Ok(value.clone()),
        }
    }
}

impl Serialize for Part {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Part {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Part::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// A chat message.
///
/// Older clients send a plain `content` string instead of `parts`; both are
/// accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Message {
    /// Creates a message from parts.
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self {
            id: None,
            role,
            parts,
            content: None,
        }
    }

    /// Creates a user message holding a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Creates an assistant message holding a single text part.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![Part::text(text)])
    }

    /// Plain text of the message: text parts joined, or legacy `content`.
    pub fn text(&self) -> String {
        let joined: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if joined.is_empty() {
            self.content.clone().unwrap_or_default()
        } else {
            joined.join("\n")
        }
    }

    /// Tool invocation parts in order.
    pub fn tool_parts(&self) -> impl Iterator<Item = &ToolPart> {
        self.parts.iter().filter_map(|part| match part {
            Part::Tool(tool) => Some(tool),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_part_states_only_move_forward() {
        let mut part = ToolPart::new(ToolCallId::new("c1"), "storeLink");
        part.accept_input(json!({})).unwrap();
        part.complete(json!({ "success": true })).unwrap();

        assert!(part.is_resolved());
        assert!(part.advance(ToolPartState::InputAvailable).is_err());
        assert!(part.fail("late").is_err());
        assert_eq!(part.state, ToolPartState::OutputAvailable);
    }

    #[test]
    fn tool_part_can_fail_while_streaming() {
        let mut part = ToolPart::new(ToolCallId::new("c1"), "addProduct");
        part.fail("Invalid arguments").unwrap();
        assert_eq!(part.state, ToolPartState::OutputError);
        assert_eq!(part.error_text.as_deref(), Some("Invalid arguments"));
    }

    #[test]
    fn output_requires_input_first() {
        let mut part = ToolPart::new(ToolCallId::new("c1"), "storeLink");
        assert!(part.complete(json!({})).is_err());
    }

    #[test]
    fn deserializes_ui_message_parts() {
        let message: Message = serde_json::from_value(json!({
            "id": "m1",
            "role": "assistant",
            "parts": [
                { "type": "step-start" },
                { "type": "text", "text": "Setting up your store." },
                {
                    "type": "tool-storeLink",
                    "toolCallId": "call_1",
                    "state": "output-available",
                    "input": {},
                    "output": { "success": true, "status": "done", "message": "ok" }
                },
                {
                    "type": "dynamic-tool",
                    "toolName": "webSearch",
                    "toolCallId": "call_2",
                    "state": "output-error",
                    "errorText": "timeout"
                }
            ]
        }))
        .unwrap();

        assert_eq!(message.parts.len(), 4);
        assert!(matches!(message.parts[0], Part::Other(_)));
        let tools: Vec<&ToolPart> = message.tool_parts().collect();
        assert_eq!(tools[0].tool_name, "storeLink");
        assert_eq!(tools[1].tool_name, "webSearch");
        assert_eq!(tools[1].state, ToolPartState::OutputError);
    }

    #[test]
    fn serializes_tool_name_into_type_tag() {
        let mut part = ToolPart::new(ToolCallId::new("call_9"), "mailSetup");
        part.accept_input(json!({})).unwrap();
        let value = serde_json::to_value(Part::Tool(part)).unwrap();

        assert_eq!(value["type"], "tool-mailSetup");
        assert_eq!(value["toolCallId"], "call_9");
        assert_eq!(value["state"], "input-available");
        assert!(value.get("toolName").is_none());
    }

    #[test]
    fn unknown_parts_round_trip_verbatim() {
        let raw = json!({ "type": "reasoning", "text": "thinking", "providerMetadata": { "a": 1 } });
        let part: Part = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&part).unwrap(), raw);
    }

    #[test]
    fn text_falls_back_to_legacy_content() {
        let message: Message =
            serde_json::from_value(json!({ "role": "user", "content": "run everything" })).unwrap();
        assert_eq!(message.text(), "run everything");
    }

    #[test]
    fn text_joins_text_parts() {
        let message = Message::new(Role::User, vec![Part::text("hello"), Part::text("world")]);
        assert_eq!(message.text(), "hello\nworld");
    }
}
