//! Shopify adapters.
//!
//! - `ShopifyClient` - Admin REST API product operations

mod client;

pub use client::ShopifyClient;
