//! Shared state handed to every route.

use std::sync::Arc;

use crate::application::ChatOrchestrator;
use crate::ports::{BlobStorage, DeckRenderer};

/// Dependencies of the HTTP routes.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: ChatOrchestrator,
    pub renderer: Arc<dyn DeckRenderer>,
    pub storage: Arc<dyn BlobStorage>,
    /// Key prefix for uploaded decks, without slashes at either end.
    pub deck_prefix: String,
}

impl AppState {
    pub fn new(
        orchestrator: ChatOrchestrator,
        renderer: Arc<dyn DeckRenderer>,
        storage: Arc<dyn BlobStorage>,
        deck_prefix: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            renderer,
            storage,
            deck_prefix: deck_prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Storage key for an uploaded deck file.
    pub fn deck_key(&self, file_name: &str) -> String {
        if self.deck_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.deck_prefix, file_name)
        }
    }
}
