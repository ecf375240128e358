//! Request body of the chat endpoint.

use serde::Deserialize;

use crate::application::ChatRequest;
use crate::domain::chat::Message;
use crate::domain::foundation::UserId;

/// `POST /api/chat` body: the full UI message history plus the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ChatRequestBody {
    /// Converts into an orchestrator request. Blank user ids count as absent.
    pub fn into_request(self) -> Option<ChatRequest> {
        let messages = self.messages.filter(|messages| !messages.is_empty())?;
        let user_id = self.user_id.and_then(|id| UserId::new(id).ok());
        Some(ChatRequest::new(messages, user_id))
    }
}
