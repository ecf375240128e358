//! Store Client Port - product management on a connected e-commerce store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StoreCredential;

/// Port for store product operations.
///
/// Every call is scoped by the credential it is given; implementations hold
/// no per-user state.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Creates a product with a single variant.
    async fn create_product(
        &self,
        credential: &StoreCredential,
        product: &NewProduct,
    ) -> Result<CreatedProduct, StoreError>;

    /// Deletes a product by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the store has no such product.
    async fn delete_product(&self, credential: &StoreCredential, product_id: &str) -> Result<(), StoreError>;

    /// Lists up to `limit` products.
    async fn list_products(
        &self,
        credential: &StoreCredential,
        limit: u32,
    ) -> Result<Vec<ProductSummary>, StoreError>;

    /// Storefront and admin links for a product.
    fn product_links(&self, credential: &StoreCredential, product: &CreatedProduct) -> ProductLinks;
}

/// Product to create.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default = "default_inventory_quantity")]
    pub inventory_quantity: i64,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

fn default_inventory_quantity() -> i64 {
    10
}

/// Product as returned by the store after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedProduct {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub price: Option<String>,
    pub sku: Option<String>,
    pub inventory_quantity: Option<i64>,
}

/// Id and title of an existing product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
}

/// Links to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductLinks {
    pub admin_url: String,
    pub store_url: String,
}

/// Store API errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced product does not exist.
    #[error("product not found")]
    NotFound,

    /// Non-success response from the store API.
    #[error("Shopify API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// Transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected response body.
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl StoreError {
    /// Creates an API error from a status and body text.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Short label used when reporting per-item failures.
    pub fn short_label(&self) -> String {
        match self {
            StoreError::NotFound => "HTTP 404".to_string(),
            StoreError::Api { status, .. } => format!("HTTP {}", status),
            other => other.to_string(),
        }
    }
}
