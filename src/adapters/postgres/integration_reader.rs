//! PostgreSQL implementation of IntegrationReader.
//!
//! Reads the `integrations` table written by the store-connection flow.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{IntegrationKind, IntegrationReader, StoreCredential};

/// PostgreSQL implementation of the IntegrationReader port.
pub struct PostgresIntegrationReader {
    pool: PgPool,
}

impl PostgresIntegrationReader {
    /// Creates a new reader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row for active integration lookups.
#[derive(Debug, sqlx::FromRow)]
struct IntegrationRow {
    external_id: String,
    access_token: String,
}

impl From<IntegrationRow> for StoreCredential {
    fn from(row: IntegrationRow) -> Self {
        StoreCredential::new(row.external_id, row.access_token)
    }
}

#[async_trait]
impl IntegrationReader for PostgresIntegrationReader {
    async fn find_active(
        &self,
        user_id: &UserId,
        kind: IntegrationKind,
    ) -> Result<Option<StoreCredential>, DomainError> {
        let row: Option<IntegrationRow> = sqlx::query_as(
            r#"
            SELECT external_id, access_token
            FROM integrations
            WHERE user_id = $1
              AND integration_type = $2
              AND is_active = true
            LIMIT 1
            "#,
        )
        .bind(user_id.as_str())
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get integration: {}", e),
            )
        })?;

        Ok(row.map(StoreCredential::from))
    }
}
