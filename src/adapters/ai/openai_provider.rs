//! OpenAI-compatible provider - Implementation of AIProvider for any
//! `/chat/completions` endpoint speaking the OpenAI wire format.
//!
//! The default deployment points this at Gemini's OpenAI-compatible
//! endpoint, but any compatible base URL works.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gemini-2.5-flash")
//!     .with_base_url("https://generativelanguage.googleapis.com/v1beta/openai");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```
//!
//! # Streaming
//!
//! Server-Sent Events are decoded line by line. Text deltas are yielded as
//! they arrive. Tool-call fragments are accumulated per call index and
//! yielded whole once the model reports a finish reason.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::ToolCallId;
use crate::domain::tools::ToolCall;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, CompletionStream, FinishReason,
    ModelRole, ProviderInfo, StreamChunk, TokenUsage,
};

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API, without the trailing `/chat/completions`.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-compatible API provider.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our request to the wire format.
    fn to_openai_request(&self, request: &CompletionRequest, stream: bool) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage::text("system", prompt.clone()));
        }

        for msg in &request.messages {
            let role = match msg.role {
                ModelRole::System => "system",
                ModelRole::User => "user",
                ModelRole::Assistant => "assistant",
                ModelRole::Tool => "tool",
            };

            let tool_calls = if msg.tool_calls.is_empty() {
                None
            } else {
                Some(
                    msg.tool_calls
                        .iter()
                        .map(|call| OpenAIToolCall {
                            id: Some(call.id().to_string()),
                            kind: Some("function".to_string()),
                            function: OpenAIFunctionCall {
                                name: Some(call.name().to_string()),
                                arguments: Some(call.input().to_string()),
                            },
                        })
                        .collect(),
                )
            };

            messages.push(OpenAIMessage {
                role: role.to_string(),
                content: Some(msg.content.clone()),
                tool_calls,
                tool_call_id: msg.tool_call_id.as_ref().map(|id| id.to_string()),
            });
        }

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(request.tools.iter().map(|t| t.to_openai_format()).collect())
        };

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            tools,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: Some(stream),
            stream_options: if stream {
                Some(StreamOptions {
                    include_usage: true,
                })
            } else {
                None
            },
        }
    }

    async fn send(&self, request: &CompletionRequest, stream: bool) -> Result<Response, AIError> {
        let body = self.to_openai_request(request, stream);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })?;

        Self::check_status(response).await
    }

    /// Maps non-success statuses to typed errors.
    async fn check_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(Self::parse_retry_after(&error_body))),
            400 => Err(AIError::InvalidRequest(error_body)),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Extracts "try again in Xs" from an error body, defaulting to 30 seconds.
    fn parse_retry_after(error_body: &str) -> u32 {
        let message = serde_json::from_str::<Value>(error_body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string));

        if let Some(msg) = message {
            if let Some(idx) = msg.find("try again in ") {
                let rest = &msg[idx + 13..];
                let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
                if let Ok(secs) = digits.parse::<u32>() {
                    return secs;
                }
            }
        }
        30
    }

    async fn parse_response(response: Response) -> Result<CompletionResponse, AIError> {
        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                PendingToolCall {
                    id: call.id,
                    name: call.function.name.unwrap_or_default(),
                    arguments: call.function.arguments.unwrap_or_default(),
                }
                .into_tool_call()
            })
            .collect::<Vec<_>>();

        let finish_reason = match choice.finish_reason.as_deref() {
            Some(reason) => FinishReason::from_provider(reason),
            None if !tool_calls.is_empty() => FinishReason::ToolCalls,
            None => FinishReason::Stop,
        };

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            usage: openai_response
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
            model: openai_response.model.unwrap_or_default(),
            finish_reason,
        })
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut retry_count = 0;

        loop {
            let attempt = match self.send(&request, false).await {
                Ok(response) => Self::parse_response(response).await,
                Err(err) => Err(err),
            };

            match attempt {
                Ok(completion) => return Ok(completion),
                Err(err) if !err.is_retryable() || retry_count >= self.config.max_retries => {
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        retry = retry_count + 1,
                        trace_id = %request.metadata.trace_id,
                        "retrying completion"
                    );
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            sleep(Duration::from_secs(1 << retry_count)).await;
            retry_count += 1;
        }
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<CompletionStream, AIError> {
        let response = self.send(&request, true).await?;
        let mut bytes_stream = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::default();

            while let Some(chunk) = bytes_stream.next().await {
                match chunk {
                    Ok(bytes) => {
                        for item in decoder.feed(&bytes) {
                            yield item;
                        }
                    }
                    Err(e) => {
                        yield Err(AIError::network(format!("Stream error: {}", e)));
                        return;
                    }
                }
                if decoder.is_done() {
                    break;
                }
            }

            for item in decoder.finish() {
                yield item;
            }
        };

        Ok(Box::pin(stream))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai-compatible", &self.config.model)
    }
}

/// A tool call whose argument fragments are still arriving.
#[derive(Debug, Default)]
struct PendingToolCall {
    id: Option<String>,
    name: String,
    arguments: String,
}

impl PendingToolCall {
    /// Arguments that are not valid JSON are passed through as a string so
    /// that schema validation rejects them downstream.
    fn into_tool_call(self) -> ToolCall {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .map(ToolCallId::new)
            .unwrap_or_else(ToolCallId::generate);

        let input = if self.arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&self.arguments).unwrap_or(Value::String(self.arguments))
        };

        ToolCall::new(id, self.name, input)
    }
}

/// Line-buffered decoder for the chat-completions SSE stream.
#[derive(Debug, Default)]
struct SseDecoder {
    /// Raw bytes of the current incomplete line; a UTF-8 sequence may span
    /// network chunks.
    buffer: Vec<u8>,
    tool_calls: BTreeMap<usize, PendingToolCall>,
    finish_reason: Option<FinishReason>,
    usage: Option<TokenUsage>,
    done: bool,
    finished: bool,
}

impl SseDecoder {
    /// Feeds raw bytes, returning every chunk completed by them.
    ///
    /// Only complete lines are decoded as UTF-8.
    fn feed(&mut self, bytes: impl AsRef<[u8]>) -> Vec<Result<StreamChunk, AIError>> {
        self.buffer.extend_from_slice(bytes.as_ref());
        let mut results = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw);
            self.handle_line(line.trim_end_matches(&['\r', '\n'][..]), &mut results);
        }

        results
    }

    fn is_done(&self) -> bool {
        self.done
    }

    /// Flushes buffered state at end of stream.
    fn finish(&mut self) -> Vec<Result<StreamChunk, AIError>> {
        let mut results = Vec::new();
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw).into_owned();
            self.handle_line(line.trim_end(), &mut results);
        }
        if self.finished {
            return results;
        }
        self.finished = true;

        let had_tool_calls = !self.tool_calls.is_empty();
        results.extend(self.drain_tool_calls());

        let reason = self.finish_reason.unwrap_or(if had_tool_calls {
            FinishReason::ToolCalls
        } else {
            FinishReason::Stop
        });
        results.push(Ok(StreamChunk::finish(
            reason,
            self.usage.clone().unwrap_or_default(),
        )));
        results
    }

    fn drain_tool_calls(&mut self) -> Vec<Result<StreamChunk, AIError>> {
        std::mem::take(&mut self.tool_calls)
            .into_values()
            .map(|pending| Ok(StreamChunk::ToolCall(pending.into_tool_call())))
            .collect()
    }

    fn handle_line(&mut self, line: &str, results: &mut Vec<Result<StreamChunk, AIError>>) {
        let Some(data) = line.strip_prefix("data:") else {
            return;
        };
        let data = data.trim();
        if data.is_empty() {
            return;
        }
        if data == "[DONE]" {
            self.done = true;
            return;
        }

        let chunk = match serde_json::from_str::<StreamResponseChunk>(data) {
            Ok(chunk) => chunk,
            Err(e) => {
                results.push(Err(AIError::parse(format!("Failed to parse SSE chunk: {}", e))));
                return;
            }
        };

        if let Some(usage) = chunk.usage {
            self.usage = Some(TokenUsage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        for choice in chunk.choices {
            if let Some(content) = choice.delta.content.filter(|c| !c.is_empty()) {
                results.push(Ok(StreamChunk::text(content)));
            }

            for (position, fragment) in choice.delta.tool_calls.unwrap_or_default().into_iter().enumerate() {
                let index = fragment.index.unwrap_or(position);
                let pending = self.tool_calls.entry(index).or_default();
                if fragment.id.is_some() {
                    pending.id = fragment.id;
                }
                if let Some(name) = fragment.function.name {
                    pending.name.push_str(&name);
                }
                if let Some(arguments) = fragment.function.arguments {
                    pending.arguments.push_str(&arguments);
                }
            }

            if let Some(reason) = choice.finish_reason {
                self.finish_reason = Some(FinishReason::from_provider(&reason));
                results.extend(self.drain_tool_calls());
            }
        }
    }
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_options: Option<StreamOptions>,
}

#[derive(Debug, Serialize)]
struct StreamOptions {
    include_usage: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl OpenAIMessage {
    fn text(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    function: OpenAIFunctionCall,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OpenAIFunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct StreamResponseChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
    tool_calls: Option<Vec<StreamToolCallDelta>>,
}

#[derive(Debug, Deserialize)]
struct StreamToolCallDelta {
    index: Option<usize>,
    id: Option<String>,
    #[serde(default)]
    function: OpenAIFunctionCall,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::ToolDefinition;
    use crate::ports::{ModelMessage, RequestMetadata};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAIProvider {
        let config = OpenAIConfig::new("test-key")
            .with_base_url(server.uri())
            .with_max_retries(0);
        OpenAIProvider::new(config).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new("trace-1"))
            .with_system_prompt("Be brief")
            .with_message(ModelMessage::user("Give me my store link"))
            .with_tools(vec![ToolDefinition::without_input("storeLink", "Store link")])
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gemini-2.5-pro")
            .with_base_url("https://custom.api.com/")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn request_carries_tools_and_tool_linkage() {
        let provider = OpenAIProvider::new(OpenAIConfig::new("k")).unwrap();
        let call = ToolCall::new(ToolCallId::new("call_1"), "storeLink", json!({}));
        let req = request()
            .with_message(ModelMessage::assistant_with_tool_calls("", vec![call]))
            .with_message(ModelMessage::tool_result(ToolCallId::new("call_1"), "{\"success\":true}"));

        let wire = serde_json::to_value(provider.to_openai_request(&req, true)).unwrap();

        assert_eq!(wire["messages"][0]["role"], "system");
        assert_eq!(wire["messages"][2]["tool_calls"][0]["id"], "call_1");
        assert_eq!(wire["messages"][2]["tool_calls"][0]["function"]["arguments"], "{}");
        assert_eq!(wire["messages"][3]["role"], "tool");
        assert_eq!(wire["messages"][3]["tool_call_id"], "call_1");
        assert_eq!(wire["tools"][0]["function"]["name"], "storeLink");
        assert_eq!(wire["stream_options"]["include_usage"], true);
    }

    #[test]
    fn decoder_yields_text_deltas() {
        let mut decoder = SseDecoder::default();
        let chunks = decoder.feed(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n",
        );

        let texts: Vec<_> = chunks.into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(texts, vec![StreamChunk::text("Hel"), StreamChunk::text("lo")]);
    }

    #[test]
    fn decoder_buffers_partial_lines() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.feed("data: {\"choices\":[{\"delta\":").is_empty());
        let chunks = decoder.feed("{\"content\":\"Hi\"}}]}\n");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap(), &StreamChunk::text("Hi"));
    }

    #[test]
    fn decoder_keeps_multibyte_characters_split_across_chunks() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"café 📊\"}}]}\n";
        let bytes = line.as_bytes();
        // Split between the two bytes of 'é'.
        let split = line.find('é').unwrap() + 1;

        let mut decoder = SseDecoder::default();
        assert!(decoder.feed(&bytes[..split]).is_empty());
        let chunks = decoder.feed(&bytes[split..]);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap(), &StreamChunk::text("café 📊"));
    }

    #[test]
    fn decoder_accumulates_tool_call_fragments() {
        let mut decoder = SseDecoder::default();
        let mut chunks = decoder.feed(concat!(
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_9\",\"function\":{\"name\":\"webSearch\",\"arguments\":\"{\\\"query\\\":\"}}]}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"\\\"shoes\\\"}\"}}]}}]}\n",
            "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"tool_calls\"}]}\n",
            "data: {\"choices\":[],\"usage\":{\"prompt_tokens\":10,\"completion_tokens\":5}}\n",
            "data: [DONE]\n",
        ));
        assert!(decoder.is_done());
        chunks.extend(decoder.finish());

        let chunks: Vec<_> = chunks.into_iter().map(|c| c.unwrap()).collect();
        match &chunks[0] {
            StreamChunk::ToolCall(call) => {
                assert_eq!(call.id().as_str(), "call_9");
                assert_eq!(call.name(), "webSearch");
                assert_eq!(call.input(), &json!({"query": "shoes"}));
            }
            other => panic!("expected tool call, got {:?}", other),
        }
        assert_eq!(
            chunks[1],
            StreamChunk::finish(FinishReason::ToolCalls, TokenUsage::new(10, 5))
        );
    }

    #[test]
    fn decoder_generates_missing_ids_and_keeps_bad_arguments_raw() {
        let mut decoder = SseDecoder::default();
        decoder.feed(
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"function\":{\"name\":\"webSearch\",\"arguments\":\"{oops\"}}]}}]}\n",
        );
        let chunks: Vec<_> = decoder.finish().into_iter().map(|c| c.unwrap()).collect();

        match &chunks[0] {
            StreamChunk::ToolCall(call) => {
                assert!(call.id().as_str().starts_with("call_"));
                assert_eq!(call.input(), &Value::String("{oops".to_string()));
            }
            other => panic!("expected tool call, got {:?}", other),
        }
        assert!(chunks[1].is_final());
    }

    #[test]
    fn decoder_reports_malformed_chunks() {
        let mut decoder = SseDecoder::default();
        let chunks = decoder.feed("data: {not json}\n");
        assert!(matches!(chunks[0], Err(AIError::Parse(_))));
    }

    #[test]
    fn decoder_finishes_once() {
        let mut decoder = SseDecoder::default();
        assert_eq!(decoder.finish().len(), 1);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit exceeded. Please try again in 12 seconds."}}"#;
        assert_eq!(OpenAIProvider::parse_retry_after(error), 12);
        assert_eq!(OpenAIProvider::parse_retry_after("{}"), 30);
    }

    #[tokio::test]
    async fn complete_parses_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "gemini-2.5-flash",
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {"name": "storeLink", "arguments": "{}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {"prompt_tokens": 7, "completion_tokens": 3}
            })))
            .mount(&server)
            .await;

        let response = provider_for(&server).complete(request()).await.unwrap();

        assert_eq!(response.content, "");
        assert_eq!(response.finish_reason, FinishReason::ToolCalls);
        assert_eq!(response.tool_calls[0].name(), "storeLink");
        assert_eq!(response.usage.total_tokens, 10);
    }

    #[tokio::test]
    async fn complete_maps_auth_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = provider_for(&server).complete(request()).await.unwrap_err();
        assert!(matches!(err, AIError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn stream_complete_decodes_sse_body() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Here\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" you go\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let stream = provider_for(&server).stream_complete(request()).await.unwrap();
        let chunks: Vec<_> = stream.map(|c| c.unwrap()).collect().await;

        assert_eq!(
            chunks,
            vec![
                StreamChunk::text("Here"),
                StreamChunk::text(" you go"),
                StreamChunk::finish(FinishReason::Stop, TokenUsage::zero()),
            ]
        );
    }
}
