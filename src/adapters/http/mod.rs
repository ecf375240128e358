//! HTTP adapters - axum routes over the chat orchestrator and deck ports.
//!
//! - `chat` - Streaming UI message endpoint
//! - `pitchdeck` - PDF export and upload
//! - `router` - Route assembly, CORS, tracing and timeouts

pub mod chat;
pub mod error;
pub mod pitchdeck;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use router::{app_router, HttpSettings};
pub use state::AppState;
