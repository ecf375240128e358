//! Shared wiring for the HTTP integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use launchdesk::adapters::ai::MockAIProvider;
use launchdesk::adapters::generation::HttpGenerationService;
use launchdesk::adapters::http::{app_router, AppState, HttpSettings};
use launchdesk::adapters::shopify::ShopifyClient;
use launchdesk::adapters::storage::{InMemoryIntegrationReader, LocalBlobStorage};
use launchdesk::adapters::tools::{build_registry, ToolDependencies};
use launchdesk::application::ChatOrchestrator;
use launchdesk::domain::foundation::DeckId;
use launchdesk::domain::pitch_deck::Slide;
use launchdesk::ports::{DeckRenderer, ExportError, RenderedDeck};

pub const PUBLIC_BASE_URL: &str = "http://localhost:8080/files";
pub const BUCKET: &str = "product_images";

// =============================================================================
// Fakes
// =============================================================================

/// Renderer that returns a tiny PDF and records slide counts.
#[derive(Default)]
pub struct FakeRenderer {
    pub rendered: Mutex<Vec<usize>>,
    pub fail: bool,
}

impl FakeRenderer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn slide_counts(&self) -> Vec<usize> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeckRenderer for FakeRenderer {
    async fn render_pdf(&self, deck_id: &DeckId, slides: &[Slide]) -> Result<RenderedDeck, ExportError> {
        if self.fail {
            return Err(ExportError::pdf_failed("engine missing"));
        }
        self.rendered.lock().unwrap().push(slides.len());
        Ok(RenderedDeck::from_pdf(b"%PDF-1.7 fake".to_vec(), deck_id))
    }
}

// =============================================================================
// App wiring
// =============================================================================

pub struct TestApp {
    pub router: Router,
    pub chat_provider: MockAIProvider,
    pub renderer: Arc<FakeRenderer>,
}

/// Builds the full router over scripted providers and local storage.
pub fn test_app(
    chat_provider: MockAIProvider,
    tool_provider: MockAIProvider,
    renderer: FakeRenderer,
    generation_url: &str,
    storage_root: &Path,
    max_steps: u32,
) -> TestApp {
    let renderer = Arc::new(renderer);
    let storage = Arc::new(LocalBlobStorage::new(storage_root, BUCKET, PUBLIC_BASE_URL));

    let registry = build_registry(ToolDependencies {
        provider: Arc::new(tool_provider),
        integrations: Arc::new(InMemoryIntegrationReader::new()),
        store: Arc::new(ShopifyClient::new("2023-10", Duration::from_secs(5)).unwrap()),
        generation: Arc::new(HttpGenerationService::new(generation_url, Duration::from_secs(5)).unwrap()),
        renderer: renderer.clone(),
        storage: storage.clone(),
        deck_prefix: "pitch-decks".to_string(),
        product_page_size: 250,
    })
    .unwrap();

    let orchestrator = ChatOrchestrator::new(Arc::new(chat_provider.clone()), Arc::new(registry), max_steps);
    let state = AppState::new(orchestrator, renderer.clone(), storage, "pitch-decks");
    let settings = HttpSettings {
        files_root: Some(storage_root.to_path_buf()),
        ..Default::default()
    };

    TestApp {
        router: app_router(state, &settings),
        chat_provider,
        renderer,
    }
}

// =============================================================================
// Request helpers
// =============================================================================

pub async fn post_json(router: &Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Splits an SSE body into its `data:` payloads.
pub fn sse_data_lines(body: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(body)
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.trim().to_string())
        .collect()
}

/// Parses every payload except the closing marker.
pub fn sse_events(body: &[u8]) -> Vec<Value> {
    sse_data_lines(body)
        .iter()
        .filter(|line| line.as_str() != "[DONE]")
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

pub fn event_types(events: &[Value]) -> Vec<String> {
    events
        .iter()
        .map(|event| event["type"].as_str().unwrap_or_default().to_string())
        .collect()
}
