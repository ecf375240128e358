//! Product management tools backed by the user's connected Shopify store.
//!
//! Every tool requires a caller identity and an active integration; without
//! either it answers with an error envelope and makes no store call.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::tools::{decode_input, Tool, ToolContext, ToolDefinition, ToolResult};
use crate::ports::{
    IntegrationKind, IntegrationReader, NewProduct, StoreClient, StoreCredential, StoreError,
};

const NO_INTEGRATION: &str =
    "No active Shopify integration found. Please connect your Shopify store first.";

/// Shared plumbing for the product tools.
#[derive(Clone)]
pub struct ProductToolDeps {
    pub integrations: Arc<dyn IntegrationReader>,
    pub store: Arc<dyn StoreClient>,
    /// Products fetched per listing (the Admin API caps this at 250).
    pub page_size: u32,
}

impl ProductToolDeps {
    /// Looks up the caller's store credential.
    ///
    /// `action` completes the "User ID is required to ..." message.
    async fn credential(&self, ctx: &ToolContext, action: &str) -> Result<StoreCredential, ToolResult> {
        let user_id = ctx
            .user_id
            .as_ref()
            .ok_or_else(|| ToolResult::error(format!("User ID is required to {}", action)))?;

        match self.integrations.find_active(user_id, IntegrationKind::Shopify).await {
            Ok(Some(credential)) => Ok(credential),
            Ok(None) => Err(ToolResult::error(NO_INTEGRATION)),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Integration lookup failed");
                Err(ToolResult::error(NO_INTEGRATION))
            }
        }
    }
}

/// Adds a product to the store.
pub struct AddProductTool {
    definition: ToolDefinition,
    deps: ProductToolDeps,
}

impl AddProductTool {
    pub fn new(deps: ProductToolDeps) -> Self {
        let schema = json!({
            "type": "object",
            "required": ["title", "price"],
            "properties": {
                "title": { "type": "string", "description": "The product title/name" },
                "description": { "type": "string", "description": "Product description" },
                "price": { "type": "number", "description": "Product price in dollars (e.g., 19.99 for $19.99)" },
                "sku": { "type": "string", "description": "Product SKU" },
                "inventory_quantity": { "type": "integer", "description": "Initial inventory quantity (defaults to 10 if not specified)" },
                "product_type": { "type": "string", "description": "Product type/category" },
                "vendor": { "type": "string", "description": "Product vendor/brand" },
                "tags": { "type": "array", "items": { "type": "string" }, "description": "Product tags" },
                "images": { "type": "array", "items": { "type": "string" }, "description": "Product image URLs" }
            }
        });

        Self {
            definition: ToolDefinition::new(
                "addProduct",
                "Add a new product to the user's Shopify store",
                schema,
            ),
            deps,
        }
    }
}

#[async_trait]
impl Tool for AddProductTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let product: NewProduct = match decode_input(input) {
            Ok(product) => product,
            Err(result) => return result,
        };
        let credential = match self.deps.credential(ctx, "add products").await {
            Ok(credential) => credential,
            Err(result) => return result,
        };

        match self.deps.store.create_product(&credential, &product).await {
            Ok(created) => {
                let links = self.deps.store.product_links(&credential, &created);
                ToolResult::done(format!(
                    "Successfully added product \"{}\" to your Shopify store",
                    product.title
                ))
                .with(
                    "product",
                    json!({
                        "id": created.id,
                        "title": created.title,
                        "handle": created.handle,
                        "price": created.price,
                        "sku": created.sku,
                        "inventory_quantity": created.inventory_quantity,
                        "admin_url": links.admin_url,
                        "store_url": links.store_url,
                    }),
                )
            }
            Err(e) => {
                tracing::error!(tool = "addProduct", error = %e, "Error adding product to Shopify");
                ToolResult::error(format!("Failed to add product: {}", e))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteProductInput {
    product_id: String,
    #[serde(default)]
    product_title: Option<String>,
}

/// Deletes one product by id.
pub struct DeleteProductTool {
    definition: ToolDefinition,
    deps: ProductToolDeps,
}

impl DeleteProductTool {
    pub fn new(deps: ProductToolDeps) -> Self {
        let schema = json!({
            "type": "object",
            "required": ["product_id"],
            "properties": {
                "product_id": { "type": "string", "description": "The Shopify product ID to delete" },
                "product_title": { "type": "string", "description": "The product title for confirmation (optional)" }
            }
        });

        Self {
            definition: ToolDefinition::new(
                "deleteProduct",
                "Delete a product from the user's Shopify store",
                schema,
            ),
            deps,
        }
    }
}

#[async_trait]
impl Tool for DeleteProductTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let input: DeleteProductInput = match decode_input(input) {
            Ok(input) => input,
            Err(result) => return result,
        };
        let credential = match self.deps.credential(ctx, "delete products").await {
            Ok(credential) => credential,
            Err(result) => return result,
        };

        match self.deps.store.delete_product(&credential, &input.product_id).await {
            Ok(()) => {
                let title = input
                    .product_title
                    .as_deref()
                    .map(|t| format!(" \"{}\"", t))
                    .unwrap_or_default();
                ToolResult::done(format!(
                    "Successfully deleted product{} (ID: {}) from your Shopify store",
                    title, input.product_id
                ))
                .with("product_id", &input.product_id)
            }
            Err(StoreError::NotFound) => ToolResult::error(format!(
                "Product with ID {} not found. It may have already been deleted.",
                input.product_id
            )),
            Err(e) => {
                tracing::error!(tool = "deleteProduct", error = %e, "Error deleting product from Shopify");
                ToolResult::error(format!("Failed to delete product: {}", e))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteAllInput {
    #[serde(default = "default_confirm")]
    confirm: bool,
}

fn default_confirm() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct DeletedProduct {
    id: String,
    title: String,
}

#[derive(Debug, Serialize)]
struct FailedProduct {
    id: String,
    title: String,
    error: String,
}

/// Deletes every product in the store, one at a time.
pub struct DeleteAllProductsTool {
    definition: ToolDefinition,
    deps: ProductToolDeps,
}

impl DeleteAllProductsTool {
    pub fn new(deps: ProductToolDeps) -> Self {
        let schema = json!({
            "type": "object",
            "properties": {
                "confirm": { "type": "boolean", "description": "Confirmation to delete all products (defaults to true)" }
            }
        });

        Self {
            definition: ToolDefinition::new(
                "deleteAllProducts",
                "Delete all products from the user's Shopify store",
                schema,
            ),
            deps,
        }
    }
}

#[async_trait]
impl Tool for DeleteAllProductsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let input: DeleteAllInput = match decode_input(input) {
            Ok(input) => input,
            Err(result) => return result,
        };
        if ctx.user_id.is_none() {
            return ToolResult::error("User ID is required to delete products");
        }
        if !input.confirm {
            return ToolResult::error(
                "Operation cancelled - confirmation required to delete all products",
            );
        }
        let credential = match self.deps.credential(ctx, "delete products").await {
            Ok(credential) => credential,
            Err(result) => return result,
        };

        let products = match self.deps.store.list_products(&credential, self.deps.page_size).await {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(tool = "deleteAllProducts", error = %e, "Failed to fetch products");
                return ToolResult::error(format!("Failed to delete all products: {}", e));
            }
        };

        if products.is_empty() {
            return ToolResult::done("No products found in your store to delete")
                .with("deleted_count", 0);
        }

        let total = products.len();
        let mut deleted = Vec::new();
        let mut failed = Vec::new();

        for product in products {
            match self.deps.store.delete_product(&credential, &product.id).await {
                Ok(()) => deleted.push(DeletedProduct {
                    id: product.id,
                    title: product.title,
                }),
                Err(e) => {
                    tracing::warn!(product_id = %product.id, error = %e, "Product delete failed");
                    failed.push(FailedProduct {
                        id: product.id,
                        title: product.title,
                        error: e.short_label(),
                    });
                }
            }
        }

        let suffix = if failed.is_empty() {
            String::new()
        } else {
            format!(" ({} failed)", failed.len())
        };

        ToolResult::done(format!(
            "Successfully deleted {} products from your Shopify store{}",
            deleted.len(),
            suffix
        ))
        .with("deleted_count", deleted.len())
        .with("failed_count", failed.len())
        .with("total_products", total)
        .with("deleted_products", &deleted)
        .with("failed_products", &failed)
    }
}
