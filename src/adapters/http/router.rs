//! Top-level router assembly.

use std::path::PathBuf;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use http::HeaderValue;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::chat::chat_routes;
use super::pitchdeck::pitchdeck_routes;
use super::state::AppState;

/// Transport settings for the router.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Timeout for the non-streaming routes.
    pub request_timeout: Duration,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    /// Directory served under `/files`, if any.
    pub files_root: Option<PathBuf>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
            files_root: None,
        }
    }
}

/// Builds the application router.
///
/// # Routes
///
/// - `GET /health` - Liveness probe
/// - `POST /api/chat` - Streaming chat (no timeout)
/// - `POST /api/pitchdeck/export`, `POST /api/pitchdeck/upload` - PDF routes
/// - `GET /files/*` - Stored blobs, when a files root is configured
pub fn app_router(state: AppState, settings: &HttpSettings) -> Router {
    let bounded = Router::new()
        .route("/health", get(health))
        .merge(pitchdeck_routes())
        .layer(TimeoutLayer::new(settings.request_timeout));

    let mut router = Router::new()
        .merge(chat_routes())
        .merge(bounded)
        .with_state(state);

    if let Some(root) = &settings.files_root {
        router = router.nest_service("/files", ServeDir::new(root));
    }

    router
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if allowed.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
