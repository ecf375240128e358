//! Streaming chat orchestrator.
//!
//! Runs the model in steps. Each step streams the model's text, executes the
//! tool calls it asks for and feeds their results back, until the model
//! answers without calling a tool or the step ceiling is reached. In
//! full-flow mode only the next tool of the fixed sequence is offered.

use std::sync::Arc;

use async_stream::stream;
use futures::future::join_all;
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::history::to_model_messages;
use super::system_prompt::SYSTEM_PROMPT;
use crate::domain::chat::{Message, UiStreamEvent};
use crate::domain::flow::{detect_full_flow, Step, StepHistory, StepPolicy, StepToolRef};
use crate::domain::foundation::UserId;
use crate::domain::tools::{ToolCall, ToolContext, ToolOutcome, ToolRegistry};
use crate::ports::{AIProvider, CompletionRequest, ModelMessage, RequestMetadata, StreamChunk};

/// One chat submission.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub user_id: Option<UserId>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>, user_id: Option<UserId>) -> Self {
        Self { messages, user_id }
    }
}

/// Drives model steps and tool execution for a chat request.
#[derive(Clone)]
pub struct ChatOrchestrator {
    provider: Arc<dyn AIProvider>,
    registry: Arc<ToolRegistry>,
    system_prompt: Arc<str>,
    max_steps: u32,
}

impl ChatOrchestrator {
    pub fn new(provider: Arc<dyn AIProvider>, registry: Arc<ToolRegistry>, max_steps: u32) -> Self {
        Self {
            provider,
            registry,
            system_prompt: Arc::from(SYSTEM_PROMPT),
            max_steps: max_steps.max(1),
        }
    }

    /// Replaces the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Arc::from(prompt.into());
        self
    }

    /// Maximum number of model steps per request.
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Runs a request, yielding UI stream events until a terminal one.
    ///
    /// Cancelling `cancel` (or dropping the stream) abandons the in-flight
    /// model call and starts no further tools; the stream then ends without
    /// a `finish` event.
    pub fn run(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> impl Stream<Item = UiStreamEvent> + Send + 'static {
        let provider = Arc::clone(&self.provider);
        let registry = Arc::clone(&self.registry);
        let system_prompt = Arc::clone(&self.system_prompt);
        let max_steps = self.max_steps;

        stream! {
            let message_id = format!("msg_{}", Uuid::new_v4().simple());
            let policy = if detect_full_flow(&request.messages) {
                StepPolicy::FullFlow
            } else {
                StepPolicy::Unrestricted
            };
            let user_id = request.user_id;
            let mut conversation = to_model_messages(&request.messages);
            let mut steps = StepHistory::new();
            let mut truncated = false;

            tracing::info!(
                message_id = %message_id,
                full_flow = matches!(policy, StepPolicy::FullFlow),
                history = conversation.len(),
                "Chat request started"
            );

            yield UiStreamEvent::Start { message_id: Some(message_id.clone()) };

            for step_index in 0..max_steps {
                let availability = policy.availability(&steps);
                let completion = CompletionRequest::new(
                    RequestMetadata::new(message_id.clone()).with_user(user_id.clone()),
                )
                .with_system_prompt(system_prompt.to_string())
                .with_messages(conversation.clone())
                .with_tools(registry.definitions(&availability));

                tracing::debug!(step = step_index, availability = ?availability, "Starting model step");
                yield UiStreamEvent::StartStep;

                let opened = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    opened = provider.stream_complete(completion) => Some(opened),
                };
                let mut chunks = match opened {
                    None => {
                        tracing::info!(step = step_index, "Chat request cancelled");
                        return;
                    }
                    Some(Ok(chunks)) => chunks,
                    Some(Err(e)) => {
                        tracing::error!(step = step_index, error = %e, "Model call failed");
                        yield UiStreamEvent::Error { error_text: e.to_string() };
                        return;
                    }
                };

                let text_id = format!("txt_{}", Uuid::new_v4().simple());
                let mut text = String::new();
                let mut text_open = false;
                let mut calls: Vec<ToolCall> = Vec::new();

                loop {
                    let next = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => None,
                        next = chunks.next() => Some(next),
                    };
                    let chunk = match next {
                        None => {
                            tracing::info!(step = step_index, "Chat request cancelled mid-stream");
                            return;
                        }
                        Some(None) => break,
                        Some(Some(chunk)) => chunk,
                    };

                    match chunk {
                        Ok(StreamChunk::TextDelta(delta)) => {
                            if !text_open {
                                text_open = true;
                                yield UiStreamEvent::TextStart { id: text_id.clone() };
                            }
                            text.push_str(&delta);
                            yield UiStreamEvent::TextDelta { id: text_id.clone(), delta };
                        }
                        Ok(StreamChunk::ToolCall(call)) => calls.push(call),
                        Ok(StreamChunk::Finish { .. }) => break,
                        Err(e) => {
                            tracing::error!(step = step_index, error = %e, "Model stream failed");
                            if text_open {
                                yield UiStreamEvent::TextEnd { id: text_id.clone() };
                            }
                            yield UiStreamEvent::Error { error_text: e.to_string() };
                            return;
                        }
                    }
                }

                if text_open {
                    yield UiStreamEvent::TextEnd { id: text_id.clone() };
                }

                if calls.is_empty() {
                    conversation.push(ModelMessage::assistant(text));
                    steps.record(Step::default());
                    yield UiStreamEvent::FinishStep;
                    break;
                }

                for call in &calls {
                    yield UiStreamEvent::ToolInputAvailable {
                        tool_call_id: call.id().clone(),
                        tool_name: call.name().to_string(),
                        input: call.input().clone(),
                    };
                }

                let invocations = calls.iter().map(|call| {
                    let ctx = ToolContext::new(call.id().clone(), user_id.clone());
                    let registry = &registry;
                    let availability = &availability;
                    async move { registry.invoke(call, availability, &ctx).await }
                });
                let outcomes = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    outcomes = join_all(invocations) => Some(outcomes),
                };
                let Some(outcomes) = outcomes else {
                    tracing::info!(step = step_index, "Chat request cancelled during tool execution");
                    return;
                };

                let mut step = Step::default();
                let mut results = Vec::with_capacity(calls.len());
                for (call, outcome) in calls.iter().zip(outcomes) {
                    let reference = StepToolRef::new(call.id().clone(), call.name());
                    match &outcome {
                        ToolOutcome::Completed(result) => {
                            step.tool_calls.push(reference.clone());
                            step.tool_results.push(reference);
                            tracing::info!(
                                tool = %call.name(),
                                tool_call_id = %call.id(),
                                success = result.is_success(),
                                "Tool call finished"
                            );
                            yield UiStreamEvent::ToolOutputAvailable {
                                tool_call_id: call.id().clone(),
                                output: result.to_value(),
                            };
                        }
                        ToolOutcome::Rejected(rejection) => {
                            yield UiStreamEvent::ToolOutputError {
                                tool_call_id: call.id().clone(),
                                error_text: rejection.to_string(),
                            };
                        }
                    }
                    results.push(ModelMessage::tool_result(
                        call.id().clone(),
                        outcome.to_model_value().to_string(),
                    ));
                }

                conversation.push(ModelMessage::assistant_with_tool_calls(text, calls));
                conversation.extend(results);
                steps.record(step);
                yield UiStreamEvent::FinishStep;

                if step_index + 1 == max_steps {
                    truncated = true;
                }
            }

            if truncated {
                tracing::warn!(
                    message_id = %message_id,
                    max_steps,
                    "Step ceiling reached while tools were still being called"
                );
            }
            tracing::info!(message_id = %message_id, steps = steps.len(), truncated, "Chat request finished");
            yield UiStreamEvent::finish(truncated);
        }
    }
}
