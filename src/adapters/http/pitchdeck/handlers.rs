//! Pitch deck export and upload handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};
use tracing::{error, info, warn};

use crate::adapters::http::error::{ApiError, ApiResult};
use crate::adapters::http::state::AppState;
use crate::domain::foundation::{DeckId, ValidationError};
use crate::domain::pitch_deck::normalize_slides;
use crate::ports::{RenderedDeck, StorageError};

use super::dto::{decode_pdf_buffer, ExportRequest, PdfBufferError, UploadRequest, UploadResponse};

/// POST /api/pitchdeck/export - Render slides to a downloadable PDF
pub async fn export_pitch_deck(
    State(state): State<AppState>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;

    let deck_id = match body.deck_id.map(DeckId::new) {
        None | Some(Err(ValidationError::EmptyField { .. })) => {
            return Err(ApiError::missing_parameters())
        }
        Some(Err(err)) => {
            warn!(error = %err, "Rejected deck id");
            return Err(ApiError::bad_request("Invalid deckId"));
        }
        Some(Ok(id)) => id,
    };
    let raw_slides = body
        .slides
        .filter(|slides| !slides.is_null())
        .ok_or_else(ApiError::missing_parameters)?;

    // An empty list renders as a cover page.
    let slides = normalize_slides(&raw_slides).unwrap_or_default();

    let deck = state
        .renderer
        .render_pdf(&deck_id, &slides)
        .await
        .map_err(|err| {
            error!(deck_id = %deck_id, error = %err, "PDF generation failed");
            ApiError::internal("Failed to generate PDF")
        })?;

    info!(deck_id = %deck_id, slides = slides.len(), bytes = deck.content.len(), "Pitch deck exported");

    Ok((
        [
            (CONTENT_TYPE, RenderedDeck::CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, deck.content_disposition()),
        ],
        deck.content,
    ))
}

/// POST /api/pitchdeck/upload - Store a PDF and return its public URL
pub async fn upload_pitch_deck(
    State(state): State<AppState>,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let Json(body) = body?;

    let file_name = body
        .file_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(ApiError::missing_parameters)?;
    let raw = body.pdf_buffer.ok_or_else(ApiError::missing_parameters)?;

    let bytes = decode_pdf_buffer(&raw).map_err(|err| match err {
        PdfBufferError::Missing => ApiError::missing_parameters(),
        PdfBufferError::Invalid(reason) => ApiError::bad_request(reason),
    })?;

    let key = state.deck_key(&file_name);
    let stored = state
        .storage
        .upload(&key, &bytes, RenderedDeck::CONTENT_TYPE)
        .await
        .map_err(|err| match err {
            StorageError::InvalidKey(_) => ApiError::bad_request("Invalid file name"),
            other => {
                error!(key = %key, error = %other, "Pitch deck upload failed");
                ApiError::internal("Failed to upload PDF")
            }
        })?;

    info!(key = %stored.key, size_bytes = stored.size_bytes, "Pitch deck uploaded");

    Ok(Json(UploadResponse {
        success: true,
        pdf_url: stored.public_url,
    }))
}
