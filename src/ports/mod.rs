//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - language model completions and tool calls
//! - `IntegrationReader` - stored store credentials
//! - `StoreClient` - store product management
//! - `GenerationService` - legal, branding and video generation backend
//! - `DeckRenderer` - pitch deck PDF rendering
//! - `BlobStorage` - uploaded artifacts

mod ai_provider;
mod blob_storage;
mod deck_renderer;
mod generation_service;
mod integration_reader;
mod store_client;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, CompletionStream, FinishReason,
    ModelMessage, ModelRole, ProviderInfo, RequestMetadata, StreamChunk, TokenUsage,
};
pub use blob_storage::{BlobStorage, StorageError, StoredBlob};
pub use deck_renderer::{DeckRenderer, ExportError, RenderedDeck};
pub use generation_service::{GenerationError, GenerationService, LegalDocsPayload, VideoPayload};
pub use integration_reader::{IntegrationKind, IntegrationReader, StoreCredential};
pub use store_client::{
    CreatedProduct, NewProduct, ProductLinks, ProductSummary, StoreClient, StoreError,
};
