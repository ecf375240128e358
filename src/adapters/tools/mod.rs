//! Tool implementations and registry assembly.
//!
//! - `store_tools` - fixed store details (link, inbox, phone)
//! - `product_tools` - Shopify product management
//! - `research_tools` - model-backed market, influencer and web research
//! - `content_tools` - legal, branding and video generation
//! - `pitch_deck_tool` - pitch deck generation and PDF publishing

mod content_tools;
mod pitch_deck_tool;
mod product_tools;
mod prompting;
mod research_tools;
mod store_tools;

use std::sync::Arc;

pub use content_tools::{
    parse_legal_docs, GenerateBrandingTool, GenerateBrandingVideoTool, GenerateLegalDocsTool,
    LegalDocs,
};
pub use pitch_deck_tool::{slides_from_model, GeneratePitchDeckTool};
pub use product_tools::{AddProductTool, DeleteAllProductsTool, DeleteProductTool, ProductToolDeps};
pub use research_tools::{
    research_queries, InfluencerSearchTool, MarketSearchTool, SearchFocus, WebSearchTool,
};
pub use store_tools::{
    MailSetupTool, PhoneAssistantTool, StoreLinkTool, ASSISTANT_PHONE_NUMBER, STORE_URL,
};

use crate::domain::foundation::DomainError;
use crate::domain::tools::{Tool, ToolRegistry};
use crate::ports::{
    AIProvider, BlobStorage, DeckRenderer, GenerationService, IntegrationReader, StoreClient,
};

/// Everything the tool set needs from the outside world.
#[derive(Clone)]
pub struct ToolDependencies {
    pub provider: Arc<dyn AIProvider>,
    pub integrations: Arc<dyn IntegrationReader>,
    pub store: Arc<dyn StoreClient>,
    pub generation: Arc<dyn GenerationService>,
    pub renderer: Arc<dyn DeckRenderer>,
    pub storage: Arc<dyn BlobStorage>,
    /// Key prefix for uploaded pitch decks.
    pub deck_prefix: String,
    /// Products listed per bulk delete.
    pub product_page_size: u32,
}

/// Builds the registry holding all thirteen tools.
pub fn build_registry(deps: ToolDependencies) -> Result<ToolRegistry, DomainError> {
    let products = ProductToolDeps {
        integrations: deps.integrations.clone(),
        store: deps.store.clone(),
        page_size: deps.product_page_size,
    };

    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(AddProductTool::new(products.clone())),
        Arc::new(DeleteProductTool::new(products.clone())),
        Arc::new(DeleteAllProductsTool::new(products)),
        Arc::new(GenerateLegalDocsTool::new(deps.generation.clone())),
        Arc::new(WebSearchTool::new(deps.provider.clone())),
        Arc::new(MarketSearchTool::new(deps.provider.clone())),
        Arc::new(GeneratePitchDeckTool::new(
            deps.provider.clone(),
            deps.renderer,
            deps.storage,
            deps.deck_prefix,
        )),
        Arc::new(GenerateBrandingTool::new(deps.generation.clone())),
        Arc::new(GenerateBrandingVideoTool::new(deps.generation)),
        Arc::new(StoreLinkTool::new()),
        Arc::new(MailSetupTool::new()),
        Arc::new(PhoneAssistantTool::new()),
        Arc::new(InfluencerSearchTool::new(deps.provider)),
    ];

    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool)?;
    }

    tracing::debug!(tools = registry.tool_count(), "Tool registry built");
    Ok(registry)
}
