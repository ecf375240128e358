//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI-compatible model provider and a scripted mock
//! - `document` - Pitch deck rendering
//! - `generation` - Legal, branding and video generation service client
//! - `http` - axum routes
//! - `postgres` - Stored integration credentials
//! - `shopify` - Shopify Admin API client
//! - `storage` - Local blob storage and in-memory credentials
//! - `tools` - The concrete tool catalogue

pub mod ai;
pub mod document;
pub mod generation;
pub mod http;
pub mod postgres;
pub mod shopify;
pub mod storage;
pub mod tools;
