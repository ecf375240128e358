//! Conversion of UI chat history into provider messages.

use serde_json::{json, Value};

use crate::domain::chat::{Message, Part, Role, ToolPart, ToolPartState};
use crate::domain::tools::ToolCall;
use crate::ports::ModelMessage;

/// Flattens UI messages into the provider's turn format.
///
/// Resolved tool parts become an assistant tool call followed by a tool
/// result; parts still waiting for output are dropped.
pub fn to_model_messages(messages: &[Message]) -> Vec<ModelMessage> {
    let mut out = Vec::with_capacity(messages.len());

    for message in messages {
        match message.role {
            Role::System => push_text(&mut out, ModelMessage::system(message.text())),
            Role::User => push_text(&mut out, ModelMessage::user(message.text())),
            Role::Assistant => assistant_turns(message, &mut out),
        }
    }

    out
}

fn push_text(out: &mut Vec<ModelMessage>, message: ModelMessage) {
    if !message.content.trim().is_empty() {
        out.push(message);
    }
}

/// Pending assistant text and tool calls, flushed whenever text follows a
/// tool call so the original ordering survives.
#[derive(Default)]
struct AssistantTurn {
    text: String,
    calls: Vec<ToolCall>,
    results: Vec<ModelMessage>,
}

impl AssistantTurn {
    fn flush(&mut self, out: &mut Vec<ModelMessage>) {
        let turn = std::mem::take(self);
        if turn.calls.is_empty() {
            push_text(out, ModelMessage::assistant(turn.text));
        } else {
            out.push(ModelMessage::assistant_with_tool_calls(turn.text, turn.calls));
            out.extend(turn.results);
        }
    }
}

fn assistant_turns(message: &Message, out: &mut Vec<ModelMessage>) {
    if message.parts.is_empty() {
        push_text(out, ModelMessage::assistant(message.text()));
        return;
    }

    let mut turn = AssistantTurn::default();
    for part in &message.parts {
        match part {
            Part::Text { text } => {
                if !turn.calls.is_empty() {
                    turn.flush(out);
                }
                if !turn.text.is_empty() {
                    turn.text.push('\n');
                }
                turn.text.push_str(text);
            }
            Part::Tool(tool) => {
                if let Some(result) = tool_result_content(tool) {
                    let input = tool.input.clone().unwrap_or_else(|| json!({}));
                    turn.calls.push(ToolCall::new(tool.tool_call_id.clone(), &tool.tool_name, input));
                    turn.results
                        .push(ModelMessage::tool_result(tool.tool_call_id.clone(), result));
                }
            }
            Part::Other(_) => {}
        }
    }
    turn.flush(out);
}

/// Serialized tool result, or `None` while the call is unresolved.
fn tool_result_content(tool: &ToolPart) -> Option<String> {
    match tool.state {
        ToolPartState::OutputAvailable => Some(
            tool.output
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_else(|| "null".to_string()),
        ),
        ToolPartState::OutputError => Some(
            json!({ "error": tool.error_text.as_deref().unwrap_or("Tool execution failed") })
                .to_string(),
        ),
        ToolPartState::InputStreaming | ToolPartState::InputAvailable => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ModelRole;

    fn history(raw: Value) -> Vec<Message> {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn plain_turns_map_one_to_one() {
        let messages = history(json!([
            { "role": "user", "content": "hi" },
            { "role": "assistant", "parts": [{ "type": "text", "text": "hello" }] }
        ]));

        let converted = to_model_messages(&messages);

        assert_eq!(converted, vec![ModelMessage::user("hi"), ModelMessage::assistant("hello")]);
    }

    #[test]
    fn resolved_tool_part_becomes_call_and_result() {
        let messages = history(json!([
            { "role": "user", "content": "store link please" },
            { "role": "assistant", "parts": [
                { "type": "step-start" },
                { "type": "text", "text": "Fetching it." },
                { "type": "tool-storeLink", "toolCallId": "c1", "state": "output-available",
                  "input": {}, "output": { "success": true } },
                { "type": "text", "text": "Here it is." }
            ]}
        ]));

        let converted = to_model_messages(&messages);

        assert_eq!(converted.len(), 4);
        assert_eq!(converted[1].role, ModelRole::Assistant);
        assert_eq!(converted[1].content, "Fetching it.");
        assert_eq!(converted[1].tool_calls[0].name(), "storeLink");
        assert_eq!(converted[2].role, ModelRole::Tool);
        assert_eq!(converted[2].content, r#"{"success":true}"#);
        assert_eq!(converted[3], ModelMessage::assistant("Here it is."));
    }

    #[test]
    fn error_parts_carry_error_text_and_pending_parts_drop() {
        let messages = history(json!([
            { "role": "assistant", "parts": [
                { "type": "tool-addProduct", "toolCallId": "c1", "state": "output-error",
                  "input": { "title": "Mug" }, "errorText": "bad price" },
                { "type": "tool-webSearch", "toolCallId": "c2", "state": "input-available",
                  "input": { "query": "x" } }
            ]}
        ]));

        let converted = to_model_messages(&messages);

        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].tool_calls.len(), 1);
        assert_eq!(converted[1].content, r#"{"error":"bad price"}"#);
    }

    #[test]
    fn empty_text_turns_are_skipped() {
        let messages = vec![Message::user("   "), Message::assistant("")];
        assert!(to_model_messages(&messages).is_empty());
    }
}
