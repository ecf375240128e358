//! Router for the chat endpoint.

use axum::{routing::post, Router};

use crate::adapters::http::state::AppState;

use super::handlers::chat;

/// Create the chat router.
///
/// # Routes
///
/// - `POST /api/chat` - Stream a chat turn as UI message events
///
/// Streaming responses are long-lived, so no request timeout applies here.
pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}
