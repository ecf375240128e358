//! Single-turn model calls shared by the model-backed tools.

use crate::domain::tools::ToolContext;
use crate::ports::{AIError, AIProvider, CompletionRequest, ModelMessage, RequestMetadata};

/// Sends one user prompt and returns the full text answer.
pub(crate) async fn ask_model(
    provider: &dyn AIProvider,
    prompt: String,
    ctx: &ToolContext,
) -> Result<String, AIError> {
    let metadata = RequestMetadata::new(ctx.tool_call_id.to_string()).with_user(ctx.user_id.clone());
    let request = CompletionRequest::new(metadata).with_message(ModelMessage::user(prompt));

    let response = provider.complete(request).await?;
    Ok(response.content)
}
