//! Deck Renderer Port - turns slides into a downloadable PDF.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::DeckId;
use crate::domain::pitch_deck::Slide;

/// Port for rendering pitch decks.
///
/// An empty slide list still renders a document (a single cover page).
#[async_trait]
pub trait DeckRenderer: Send + Sync {
    /// Renders the deck to PDF bytes.
    async fn render_pdf(&self, deck_id: &DeckId, slides: &[Slide]) -> Result<RenderedDeck, ExportError>;
}

/// A rendered deck ready for download.
#[derive(Debug, Clone)]
pub struct RenderedDeck {
    /// The PDF bytes.
    pub content: Vec<u8>,
    /// Suggested filename for download.
    pub filename: String,
}

impl RenderedDeck {
    pub const CONTENT_TYPE: &'static str = "application/pdf";

    /// Wraps PDF bytes rendered for a deck.
    pub fn from_pdf(content: Vec<u8>, deck_id: &DeckId) -> Self {
        Self {
            content,
            filename: deck_id.pdf_file_name(),
        }
    }

    /// `Content-Disposition` header value for downloads.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Errors that can occur while rendering.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// External converter (e.g., Pandoc) is not available.
    #[error("Export service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Conversion to PDF failed.
    #[error("PDF conversion failed: {0}")]
    PdfConversionFailed(String),

    /// Timeout during conversion.
    #[error("Conversion timed out after {0} seconds")]
    Timeout(u64),
}

impl ExportError {
    /// Create a service unavailable error.
    pub fn service_unavailable(reason: impl Into<String>) -> Self {
        Self::ServiceUnavailable(reason.into())
    }

    /// Create a PDF conversion error.
    pub fn pdf_failed(reason: impl Into<String>) -> Self {
        Self::PdfConversionFailed(reason.into())
    }
}
