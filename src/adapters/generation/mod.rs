//! Generation backend adapters.
//!
//! - `HttpGenerationService` - Legal document and branding generation over HTTP

mod http_service;

pub use http_service::HttpGenerationService;
