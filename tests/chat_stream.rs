//! Integration tests for the streaming chat endpoint.
//!
//! These drive the full router: request parsing, the orchestrator loop with
//! real tools, and the SSE encoding of UI stream events.

mod common;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use launchdesk::adapters::ai::{MockAIProvider, MockError};
use launchdesk::domain::chat::UiStreamEvent;
use launchdesk::domain::flow::FULL_FLOW_SEQUENCE;
use launchdesk::domain::foundation::ToolCallId;
use launchdesk::domain::tools::ToolCall;
use launchdesk::domain::tracking::{ToolCallTracker, TrackedStatus};

use common::{body_bytes, body_json, event_types, post_json, sse_data_lines, sse_events, test_app, FakeRenderer};

const NO_GENERATION_SERVICE: &str = "http://127.0.0.1:9";

fn user_turn(text: &str) -> Value {
    json!({
        "messages": [{ "id": "m1", "role": "user", "parts": [{ "type": "text", "text": text }] }]
    })
}

fn outputs_by_call<'a>(events: &'a [Value], kind: &str) -> Vec<&'a Value> {
    events.iter().filter(|e| e["type"] == kind).collect()
}

async fn generation_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/legal/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{ "doc_type": "Terms of Service", "content": "Be nice." }],
            "pdfs": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/brand/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "branding": { "name": "Glow", "tagline": "Skin first" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/brand/generate-video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video": true,
            "video_url": "https://cdn.example.com/glow.mp4"
        })))
        .mount(&server)
        .await;
    server
}

// =============================================================================
// Plain turns
// =============================================================================

#[tokio::test]
async fn text_turn_streams_ui_events_and_done_marker() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        MockAIProvider::new().with_response("Hello there friend"),
        MockAIProvider::new(),
        FakeRenderer::default(),
        NO_GENERATION_SERVICE,
        dir.path(),
        12,
    );

    let response = post_json(&app.router, "/api/chat", user_turn("hi")).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-vercel-ai-ui-message-stream"], "v1");
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let body = body_bytes(response).await;
    assert_eq!(sse_data_lines(&body).last().map(String::as_str), Some("[DONE]"));

    let events = sse_events(&body);
    let types = event_types(&events);
    assert_eq!(types.first().map(String::as_str), Some("start"));
    assert_eq!(types[1], "start-step");
    assert_eq!(types.last().map(String::as_str), Some("finish"));
    assert!(types.contains(&"text-start".to_string()));
    assert!(types.contains(&"text-end".to_string()));

    let text: String = outputs_by_call(&events, "text-delta")
        .iter()
        .map(|e| e["delta"].as_str().unwrap())
        .collect();
    assert_eq!(text, "Hello there friend");
}

#[tokio::test]
async fn missing_messages_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        MockAIProvider::new(),
        MockAIProvider::new(),
        FakeRenderer::default(),
        NO_GENERATION_SERVICE,
        dir.path(),
        12,
    );

    let response = post_json(&app.router, "/api/chat", json!({ "userId": "u1" })).await;

    assert_eq!(response.status(), 400);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
    assert_eq!(app.chat_provider.call_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        MockAIProvider::new(),
        MockAIProvider::new(),
        FakeRenderer::default(),
        NO_GENERATION_SERVICE,
        dir.path(),
        12,
    );

    let response = post_json(&app.router, "/api/chat", json!("not an object")).await;

    assert_eq!(response.status(), 400);
    assert!(body_json(response).await["error"].is_string());
}

// =============================================================================
// Tool turns
// =============================================================================

#[tokio::test]
async fn canned_tool_result_is_streamed_then_fed_back() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        MockAIProvider::new()
            .with_tool_call("storeLink", json!({}))
            .with_response("Your store is ready."),
        MockAIProvider::new(),
        FakeRenderer::default(),
        NO_GENERATION_SERVICE,
        dir.path(),
        12,
    );

    let events = sse_events(&body_bytes(post_json(&app.router, "/api/chat", user_turn("store link please")).await).await);

    let inputs = outputs_by_call(&events, "tool-input-available");
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0]["toolName"], "storeLink");

    let outputs = outputs_by_call(&events, "tool-output-available");
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0]["toolCallId"], inputs[0]["toolCallId"]);
    assert_eq!(outputs[0]["output"]["success"], true);
    assert_eq!(outputs[0]["output"]["status"], "done");
    assert!(outputs[0]["output"]["store_url"].is_string());

    assert_eq!(app.chat_provider.call_count(), 2);
    let calls = app.chat_provider.get_calls();
    let second = &calls[1];
    assert!(second.messages.len() > 1);
}

#[tokio::test]
async fn product_tool_without_user_reports_failure_envelope() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        MockAIProvider::new()
            .with_tool_call("addProduct", json!({ "title": "Serum", "price": 19.5 }))
            .with_response("Please sign in."),
        MockAIProvider::new(),
        FakeRenderer::default(),
        NO_GENERATION_SERVICE,
        dir.path(),
        12,
    );

    let events = sse_events(&body_bytes(post_json(&app.router, "/api/chat", user_turn("add a serum")).await).await);

    let outputs = outputs_by_call(&events, "tool-output-available");
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0]["output"]["success"], false);
    assert_eq!(outputs[0]["output"]["status"], "error");
    assert_eq!(outputs[0]["output"]["message"], "User ID is required to add products");
    assert!(outputs_by_call(&events, "tool-output-error").is_empty());
}

#[tokio::test]
async fn unknown_tool_is_rejected_as_output_error() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        MockAIProvider::new()
            .with_tool_call("launchRocket", json!({}))
            .with_response("Sorry."),
        MockAIProvider::new(),
        FakeRenderer::default(),
        NO_GENERATION_SERVICE,
        dir.path(),
        12,
    );

    let events = sse_events(&body_bytes(post_json(&app.router, "/api/chat", user_turn("go")).await).await);

    let errors = outputs_by_call(&events, "tool-output-error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["errorText"], "Unknown tool: launchRocket");
}

#[tokio::test]
async fn model_failure_ends_stream_with_error_event() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        }),
        MockAIProvider::new(),
        FakeRenderer::default(),
        NO_GENERATION_SERVICE,
        dir.path(),
        12,
    );

    let response = post_json(&app.router, "/api/chat", user_turn("hi")).await;
    assert_eq!(response.status(), 200);

    let body = body_bytes(response).await;
    let types = event_types(&sse_events(&body));
    assert_eq!(types.last().map(String::as_str), Some("error"));
    assert!(!types.contains(&"finish".to_string()));
    assert_eq!(sse_data_lines(&body).last().map(String::as_str), Some("[DONE]"));
}

// =============================================================================
// Full flow
// =============================================================================

#[tokio::test]
async fn full_flow_runs_each_tool_once_in_order() {
    let dir = TempDir::new().unwrap();
    let generation = generation_server().await;

    let inputs = [
        json!({ "industry": "skincare" }),
        json!({ "idea": "organic skincare" }),
        json!({ "idea": "organic skincare" }),
        json!({}),
        json!({}),
        json!({}),
        json!({ "idea": "organic skincare" }),
        json!({ "idea": "organic skincare" }),
        json!({ "idea": "organic skincare" }),
    ];
    let mut chat = MockAIProvider::new();
    for (tool, input) in FULL_FLOW_SEQUENCE.iter().zip(inputs) {
        chat = chat.with_tool_call(*tool, input);
    }
    let chat = chat.with_response("All done! Your business is ready.");

    let app = test_app(
        chat,
        MockAIProvider::new(),
        FakeRenderer::default(),
        &generation.uri(),
        dir.path(),
        12,
    );

    let body = body_bytes(
        post_json(
            &app.router,
            "/api/chat",
            user_turn("run everything for my organic skincare brand"),
        )
        .await,
    )
    .await;
    let events = sse_events(&body);

    let called: Vec<&str> = outputs_by_call(&events, "tool-input-available")
        .iter()
        .map(|e| e["toolName"].as_str().unwrap())
        .collect();
    assert_eq!(called, FULL_FLOW_SEQUENCE.to_vec());

    assert!(outputs_by_call(&events, "tool-output-error").is_empty());
    let outputs = outputs_by_call(&events, "tool-output-available");
    assert_eq!(outputs.len(), FULL_FLOW_SEQUENCE.len());

    // Each of the nine steps offered exactly the next tool in the sequence.
    for (step, tool) in FULL_FLOW_SEQUENCE.iter().enumerate() {
        assert_eq!(app.chat_provider.offered_tools(step), vec![tool.to_string()]);
    }
    assert_eq!(app.chat_provider.offered_tools(9).len(), 13);

    let deck = outputs.last().unwrap();
    assert_eq!(deck["output"]["success"], true);
    let pdf_url = deck["output"]["pdf_url"].as_str().unwrap();
    assert!(pdf_url.starts_with("http://localhost:8080/files/product_images/pitch-decks/pitch-deck-deck_"));
    assert_eq!(app.renderer.slide_counts().len(), 1);

    let finish = events.last().unwrap();
    assert_eq!(finish["type"], "finish");
    assert!(finish.get("truncated").is_none());
    assert!(finish.get("messageMetadata").is_none());
}

#[tokio::test]
async fn step_ceiling_truncates_long_runs() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        MockAIProvider::new()
            .with_tool_call("storeLink", json!({}))
            .with_tool_call("mailSetup", json!({}))
            .with_tool_call("phoneassistant", json!({})),
        MockAIProvider::new(),
        FakeRenderer::default(),
        NO_GENERATION_SERVICE,
        dir.path(),
        2,
    );

    let events = sse_events(&body_bytes(post_json(&app.router, "/api/chat", user_turn("set up")).await).await);

    assert_eq!(outputs_by_call(&events, "tool-output-available").len(), 2);
    assert_eq!(app.chat_provider.call_count(), 2);
    let finish = events.last().unwrap();
    assert_eq!(finish["type"], "finish");
    assert_eq!(finish["messageMetadata"]["truncated"], true);
    assert!(finish.get("truncated").is_none());
}

// =============================================================================
// Client-side tracking
// =============================================================================

#[tokio::test]
async fn tracker_follows_a_concurrent_step_from_the_wire() {
    let dir = TempDir::new().unwrap();
    let app = test_app(
        MockAIProvider::new()
            .with_tool_calls(vec![
                ToolCall::new(ToolCallId::new("call_a"), "storeLink", json!({})),
                ToolCall::new(ToolCallId::new("call_b"), "mailSetup", json!({})),
                ToolCall::new(ToolCallId::new("call_c"), "phoneassistant", json!({})),
            ])
            .with_response("Everything is set up."),
        MockAIProvider::new(),
        FakeRenderer::default(),
        NO_GENERATION_SERVICE,
        dir.path(),
        12,
    );

    let events: Vec<UiStreamEvent> =
        sse_events(&body_bytes(post_json(&app.router, "/api/chat", user_turn("set up")).await).await)
            .into_iter()
            .map(|event| serde_json::from_value(event).unwrap())
            .collect();

    // All three inputs are announced before any output.
    let kinds: Vec<&str> = events
        .iter()
        .filter_map(|event| match event {
            UiStreamEvent::ToolInputAvailable { .. } => Some("input"),
            UiStreamEvent::ToolOutputAvailable { .. } => Some("output"),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec!["input", "input", "input", "output", "output", "output"]);

    let mut tracker = ToolCallTracker::new();
    for event in &events {
        tracker.apply(event);
        if let UiStreamEvent::ToolOutputAvailable { tool_call_id, output } = event {
            let record = tracker.get(tool_call_id).unwrap();
            assert_eq!(record.status, TrackedStatus::Completed);
            assert_eq!(record.result.as_ref(), Some(output));
        }
    }

    let names: Vec<&str> = tracker.records().iter().map(|r| r.tool_name.as_str()).collect();
    assert_eq!(names, vec!["storeLink", "mailSetup", "phoneassistant"]);
    for id in ["call_a", "call_b", "call_c"] {
        let record = tracker.get(&ToolCallId::new(id)).unwrap();
        assert_eq!(record.status, TrackedStatus::Completed);
        assert!(record.result.is_some());
        assert!(record.end_time.is_some());
    }
    assert!(tracker.running().is_none());
}
