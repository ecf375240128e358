//! Chat HTTP adapter - streaming UI message endpoint.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::ChatRequestBody;
pub use routes::chat_routes;
