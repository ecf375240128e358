//! Shopify Admin REST client - Implementation of StoreClient.
//!
//! Talks to `{shop}/admin/api/{version}/products...` with the
//! `X-Shopify-Access-Token` header taken from the user's stored credential.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::ports::{
    CreatedProduct, NewProduct, ProductLinks, ProductSummary, StoreClient, StoreCredential,
    StoreError,
};

/// Shopify Admin API client.
#[derive(Debug, Clone)]
pub struct ShopifyClient {
    client: Client,
    api_version: String,
}

impl ShopifyClient {
    /// Creates a client for the given Admin API version (e.g. `2023-10`).
    pub fn new(api_version: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_version: api_version.into(),
        })
    }

    /// Origin of the shop. Bare domains are served over https.
    fn shop_origin(shop_domain: &str) -> String {
        let domain = shop_domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        }
    }

    fn api_url(&self, credential: &StoreCredential, path: &str) -> String {
        format!(
            "{}/admin/api/{}/{}",
            Self::shop_origin(&credential.shop_domain),
            self.api_version,
            path
        )
    }

    fn request(&self, method: Method, credential: &StoreCredential, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.api_url(credential, path))
            .header("X-Shopify-Access-Token", credential.access_token.expose_secret())
            .header("Content-Type", "application/json")
    }

    async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.as_u16() == 404 {
            return Err(StoreError::NotFound);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::api(status.as_u16(), body))
    }

    async fn json_body(response: Response) -> Result<Value, StoreError> {
        response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Request body for product creation.
    fn product_payload(product: &NewProduct) -> Value {
        let mut body = json!({
            "title": product.title,
            "variants": [{
                "price": format!("{:.2}", product.price),
                "sku": product.sku,
                "inventory_quantity": product.inventory_quantity,
                "inventory_management": "shopify"
            }]
        });

        if let Some(description) = &product.description {
            body["body_html"] = json!(format!("<p>{}</p>", description));
        }
        if let Some(vendor) = &product.vendor {
            body["vendor"] = json!(vendor);
        }
        if let Some(product_type) = &product.product_type {
            body["product_type"] = json!(product_type);
        }
        if !product.tags.is_empty() {
            body["tags"] = json!(product.tags.join(", "));
        }
        if !product.images.is_empty() {
            body["images"] = product
                .images
                .iter()
                .map(|src| json!({ "src": src }))
                .collect();
        }

        json!({ "product": body })
    }
}

/// Product ids arrive as JSON numbers; keep them as strings.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl StoreClient for ShopifyClient {
    async fn create_product(
        &self,
        credential: &StoreCredential,
        product: &NewProduct,
    ) -> Result<CreatedProduct, StoreError> {
        let request = self
            .request(Method::POST, credential, "products.json")
            .json(&Self::product_payload(product));
        let body = Self::json_body(Self::send(request).await?).await?;

        let created = &body["product"];
        let id = id_string(&created["id"])
            .ok_or_else(|| StoreError::Parse("product id missing from response".to_string()))?;
        let variant = &created["variants"][0];

        tracing::info!(
            shop = %credential.shop_domain,
            product_id = %id,
            "Created store product"
        );

        Ok(CreatedProduct {
            id,
            title: string_field(created, "title").unwrap_or_else(|| product.title.clone()),
            handle: string_field(created, "handle").unwrap_or_default(),
            price: string_field(variant, "price"),
            sku: string_field(variant, "sku"),
            inventory_quantity: variant.get("inventory_quantity").and_then(Value::as_i64),
        })
    }

    async fn delete_product(&self, credential: &StoreCredential, product_id: &str) -> Result<(), StoreError> {
        let path = format!("products/{}.json", product_id);
        Self::send(self.request(Method::DELETE, credential, &path)).await?;

        tracing::info!(
            shop = %credential.shop_domain,
            product_id = %product_id,
            "Deleted store product"
        );
        Ok(())
    }

    async fn list_products(
        &self,
        credential: &StoreCredential,
        limit: u32,
    ) -> Result<Vec<ProductSummary>, StoreError> {
        let request = self
            .request(Method::GET, credential, "products.json")
            .query(&[("limit", limit)]);
        let body = Self::json_body(Self::send(request).await?).await?;

        let products = body["products"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        Some(ProductSummary {
                            id: id_string(&item["id"])?,
                            title: string_field(item, "title").unwrap_or_default(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(products)
    }

    fn product_links(&self, credential: &StoreCredential, product: &CreatedProduct) -> ProductLinks {
        let origin = Self::shop_origin(&credential.shop_domain);
        ProductLinks {
            admin_url: format!("{}/admin/products/{}", origin, product.id),
            store_url: format!("{}/products/{}", origin, product.handle),
        }
    }
}
