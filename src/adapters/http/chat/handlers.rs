//! Streaming chat handler.

use std::convert::Infallible;
use std::time::Duration;

use async_stream::stream;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::StreamExt;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapters::http::error::{ApiError, ApiResult};
use crate::adapters::http::state::AppState;
use crate::domain::chat::{UiStreamEvent, STREAM_DONE_MARKER, UI_STREAM_HEADER};

use super::dto::ChatRequestBody;

/// POST /api/chat - Run the model/tool loop and stream UI events as SSE
///
/// Dropping the response (client disconnect) cancels the run: the in-flight
/// model call is abandoned and no further tools start.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequestBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;
    let request = body
        .into_request()
        .ok_or_else(|| ApiError::bad_request("At least one message is required"))?;

    info!(
        messages = request.messages.len(),
        has_user = request.user_id.is_some(),
        "Chat request received"
    );

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let events = state.orchestrator.run(request, cancel);

    let stream = stream! {
        let _guard = guard;
        let mut events = Box::pin(events);
        while let Some(event) = events.next().await {
            yield Ok::<_, Infallible>(as_sse_event(&event));
        }
        yield Ok(Event::default().data(STREAM_DONE_MARKER));
    };

    let sse = Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(UI_STREAM_HEADER.0),
        HeaderValue::from_static(UI_STREAM_HEADER.1),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    Ok((headers, sse))
}

fn as_sse_event(event: &UiStreamEvent) -> Event {
    match serde_json::to_string(event) {
        Ok(payload) => Event::default().data(payload),
        Err(err) => {
            warn!(error = %err, "Failed to serialize stream event");
            let fallback = json!({ "type": "error", "errorText": "Failed to encode stream event" });
            Event::default().data(fallback.to_string())
        }
    }
}
