//! PostgreSQL adapters - Database implementations for reader ports.
//!
//! - `PostgresIntegrationReader` - Active store credentials per user

mod integration_reader;

pub use integration_reader::PostgresIntegrationReader;
