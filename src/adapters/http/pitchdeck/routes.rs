//! Router for the pitch deck endpoints.

use axum::{routing::post, Router};

use crate::adapters::http::state::AppState;

use super::handlers::{export_pitch_deck, upload_pitch_deck};

/// Create the pitch deck router.
///
/// # Routes
///
/// - `POST /api/pitchdeck/export` - Render slides to PDF
/// - `POST /api/pitchdeck/upload` - Store a PDF in the deck bucket
pub fn pitchdeck_routes() -> Router<AppState> {
    Router::new()
        .route("/api/pitchdeck/export", post(export_pitch_deck))
        .route("/api/pitchdeck/upload", post(upload_pitch_deck))
}
