//! In-Memory Integration Reader
//!
//! Holds store credentials in memory. Used when no database is configured
//! and in tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{IntegrationKind, IntegrationReader, StoreCredential};

/// In-memory credential store keyed by user and integration kind.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIntegrationReader {
    credentials: Arc<RwLock<HashMap<(UserId, IntegrationKind), StoreCredential>>>,
}

impl InMemoryIntegrationReader {
    /// Create an empty reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect an integration for a user, replacing any previous one
    pub async fn connect(&self, user_id: UserId, kind: IntegrationKind, credential: StoreCredential) {
        self.credentials.write().await.insert((user_id, kind), credential);
    }

    /// Deactivate an integration
    pub async fn disconnect(&self, user_id: &UserId, kind: IntegrationKind) {
        self.credentials.write().await.remove(&(user_id.clone(), kind));
    }
}

#[async_trait]
impl IntegrationReader for InMemoryIntegrationReader {
    async fn find_active(
        &self,
        user_id: &UserId,
        kind: IntegrationKind,
    ) -> Result<Option<StoreCredential>, DomainError> {
        let credentials = self.credentials.read().await;
        Ok(credentials.get(&(user_id.clone(), kind)).cloned())
    }
}
