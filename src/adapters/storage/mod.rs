//! Storage adapters.
//!
//! - `LocalBlobStorage` - Bucket-style blob storage on the local filesystem
//! - `InMemoryIntegrationReader` - Store credentials held in memory

mod in_memory_integration_reader;
mod local_blob_storage;

pub use in_memory_integration_reader::InMemoryIntegrationReader;
pub use local_blob_storage::LocalBlobStorage;
