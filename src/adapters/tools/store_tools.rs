//! Store setup tools.
//!
//! These surface fixed store details in the chat; none of them call out.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::tools::{Tool, ToolContext, ToolDefinition, ToolResult};

/// Storefront created for new users.
pub const STORE_URL: &str = "https://rockefeller-store.myshopify.com";

/// Number answered by the customer phone assistant.
pub const ASSISTANT_PHONE_NUMBER: &str = "+1 (224) 228 9860";

/// Surfaces the created store link.
pub struct StoreLinkTool {
    definition: ToolDefinition,
}

impl StoreLinkTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::without_input(
                "storeLink",
                "Surface the created store link in the UI",
            ),
        }
    }
}

impl Default for StoreLinkTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for StoreLinkTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _input: Value, _ctx: &ToolContext) -> ToolResult {
        let display = STORE_URL.trim_start_matches("https://");
        ToolResult::done(format!(
            "Here is the link to your store: [{}]({})",
            display, STORE_URL
        ))
        .with("store_url", STORE_URL)
    }
}

/// Announces the assistant inbox setup.
pub struct MailSetupTool {
    definition: ToolDefinition,
}

impl MailSetupTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::without_input(
                "mailSetup",
                "Indicate that the customer assistant's email inbox is being set up",
            ),
        }
    }
}

impl Default for MailSetupTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for MailSetupTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _input: Value, _ctx: &ToolContext) -> ToolResult {
        ToolResult::done("Customer assistant's email inbox is being set up.")
    }
}

/// Hands out the customer phone assistant number.
pub struct PhoneAssistantTool {
    definition: ToolDefinition,
}

impl PhoneAssistantTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::without_input(
                "phoneassistant",
                "Set up your customer phone assistant",
            ),
        }
    }
}

impl Default for PhoneAssistantTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for PhoneAssistantTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _input: Value, _ctx: &ToolContext) -> ToolResult {
        ToolResult::done(format!(
            "Set up your customer phone assistant to this number: {}",
            ASSISTANT_PHONE_NUMBER
        ))
        .with("phone_number", ASSISTANT_PHONE_NUMBER)
    }
}
