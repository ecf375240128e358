//! Events of the UI message stream.
//!
//! Each event is sent as one SSE `data:` line; the stream ends with
//! `data: [DONE]`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ToolCallId;

/// Marker line that closes the stream.
pub const STREAM_DONE_MARKER: &str = "[DONE]";

/// Header announcing the UI message stream protocol version.
pub const UI_STREAM_HEADER: (&str, &str) = ("x-vercel-ai-ui-message-stream", "v1");

/// One event of the UI message stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiStreamEvent {
    #[serde(rename_all = "camelCase")]
    Start {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },

    StartStep,

    TextStart { id: String },

    TextDelta { id: String, delta: String },

    TextEnd { id: String },

    #[serde(rename_all = "camelCase")]
    ToolInputAvailable {
        tool_call_id: ToolCallId,
        tool_name: String,
        input: Value,
    },

    #[serde(rename_all = "camelCase")]
    ToolOutputAvailable {
        tool_call_id: ToolCallId,
        output: Value,
    },

    #[serde(rename_all = "camelCase")]
    ToolOutputError {
        tool_call_id: ToolCallId,
        error_text: String,
    },

    FinishStep,

    #[serde(rename_all = "camelCase")]
    Finish {
        /// Protocol-level metadata attached to the assistant message.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message_metadata: Option<Value>,
    },

    #[serde(rename_all = "camelCase")]
    Error { error_text: String },
}

impl UiStreamEvent {
    /// Closing event. A truncated run reports `{"truncated": true}` as
    /// message metadata so protocol-strict clients still accept the event.
    pub fn finish(truncated: bool) -> Self {
        UiStreamEvent::Finish {
            message_metadata: truncated.then(|| serde_json::json!({ "truncated": true })),
        }
    }

    /// True when the closing event reports a step-ceiling cut.
    pub fn is_truncated_finish(&self) -> bool {
        match self {
            UiStreamEvent::Finish {
                message_metadata: Some(metadata),
            } => metadata.get("truncated").and_then(Value::as_bool) == Some(true),
            _ => false,
        }
    }

    /// True for events after which nothing else is sent.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UiStreamEvent::Finish { .. } | UiStreamEvent::Error { .. })
    }
}
