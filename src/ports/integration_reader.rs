//! Integration Reader Port - lookup of stored third-party credentials.
//!
//! Credentials are written by the separate store-connection flow; the tool
//! layer only ever reads them.

use async_trait::async_trait;
use secrecy::Secret;

use crate::domain::foundation::{DomainError, UserId};

/// Kind of connected integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrationKind {
    Shopify,
}

impl IntegrationKind {
    /// Value stored in the `integration_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationKind::Shopify => "shopify",
        }
    }
}

/// Credentials of an active store integration.
#[derive(Debug, Clone)]
pub struct StoreCredential {
    /// Shop domain, e.g. `my-shop.myshopify.com`.
    pub shop_domain: String,
    /// Admin API access token.
    pub access_token: Secret<String>,
}

impl StoreCredential {
    pub fn new(shop_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop_domain: shop_domain.into(),
            access_token: Secret::new(access_token.into()),
        }
    }
}

/// Read-only access to stored integration credentials.
#[async_trait]
pub trait IntegrationReader: Send + Sync {
    /// Active credential of the given kind for a user, if one is connected.
    async fn find_active(
        &self,
        user_id: &UserId,
        kind: IntegrationKind,
    ) -> Result<Option<StoreCredential>, DomainError>;
}
