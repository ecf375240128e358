//! Mock AI Provider for testing.
//!
//! Provides a scripted implementation of the AIProvider port so the
//! orchestrator and model-backed tools can be exercised without a real API.
//!
//! # Features
//!
//! - Scripted turns (text, tool calls, errors) consumed in order
//! - Mid-stream failures
//! - Simulated delays for cancellation testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_tool_call("storeLink", json!({}))
//!     .with_response("Here is your store.");
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use futures::stream;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::ToolCallId;
use crate::domain::tools::ToolCall;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, CompletionStream, FinishReason,
    ProviderInfo, StreamChunk, TokenUsage,
};

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Scripted turns (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A scripted model turn.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Plain text answer.
    Text(String),
    /// Optional text followed by tool calls.
    ToolCalls { content: String, calls: Vec<ToolCall> },
    /// The request fails before any output.
    Error(MockError),
    /// Some text streams, then the stream fails.
    BrokenStream { partial: String, error: MockError },
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    /// Creates a new mock provider with an empty script.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(self, response: MockResponse) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Adds a text turn.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::Text(content.into()))
    }

    /// Adds a turn requesting a single tool call.
    pub fn with_tool_call(self, name: impl Into<String>, input: Value) -> Self {
        let call = ToolCall::new(ToolCallId::generate(), name, input);
        self.with_tool_calls(vec![call])
    }

    /// Adds a turn requesting several tool calls in one step.
    pub fn with_tool_calls(self, calls: Vec<ToolCall>) -> Self {
        self.push(MockResponse::ToolCalls {
            content: String::new(),
            calls,
        })
    }

    /// Adds an error turn.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Adds a turn whose stream fails after emitting `partial`.
    pub fn with_broken_stream(self, partial: impl Into<String>, error: MockError) -> Self {
        self.push(MockResponse::BrokenStream {
            partial: partial.into(),
            error,
        })
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    /// Tool names offered to the model on the `index`-th call.
    pub fn offered_tools(&self, index: usize) -> Vec<String> {
        lock(&self.calls)
            .get(index)
            .map(|req| req.tools.iter().map(|t| t.name().to_string()).collect())
            .unwrap_or_default()
    }

    /// Returns the number of scripted turns not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Text("Mock response".to_string()))
    }

    async fn record(&self, request: CompletionRequest) {
        lock(&self.calls).push(request);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

fn usage() -> TokenUsage {
    TokenUsage::new(10, 20)
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.record(request).await;

        let (content, tool_calls) = match self.next_response() {
            MockResponse::Text(content) => (content, Vec::new()),
            MockResponse::ToolCalls { content, calls } => (content, calls),
            MockResponse::Error(err) | MockResponse::BrokenStream { error: err, .. } => {
                return Err(err.into());
            }
        };

        let finish_reason = if tool_calls.is_empty() {
            FinishReason::Stop
        } else {
            FinishReason::ToolCalls
        };

        Ok(CompletionResponse {
            content,
            tool_calls,
            usage: usage(),
            model: self.info.model.clone(),
            finish_reason,
        })
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<CompletionStream, AIError> {
        self.record(request).await;

        let chunks: Vec<Result<StreamChunk, AIError>> = match self.next_response() {
            MockResponse::Text(content) => words(&content)
                .chain(std::iter::once(Ok(StreamChunk::finish(FinishReason::Stop, usage()))))
                .collect(),
            MockResponse::ToolCalls { content, calls } => words(&content)
                .chain(calls.into_iter().map(|c| Ok(StreamChunk::ToolCall(c))))
                .chain(std::iter::once(Ok(StreamChunk::finish(
                    FinishReason::ToolCalls,
                    usage(),
                ))))
                .collect(),
            MockResponse::BrokenStream { partial, error } => words(&partial)
                .chain(std::iter::once(Err(error.into())))
                .collect(),
            MockResponse::Error(err) => return Err(err.into()),
        };

        Ok(Box::pin(stream::iter(chunks)))
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

/// Splits content into word chunks, keeping the separators.
fn words(content: &str) -> impl Iterator<Item = Result<StreamChunk, AIError>> + '_ {
    content
        .split_inclusive(' ')
        .filter(|s| !s.is_empty())
        .map(|s| Ok(StreamChunk::text(s)))
}
