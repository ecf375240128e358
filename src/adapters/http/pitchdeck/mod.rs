//! Pitch deck HTTP adapter - PDF export and upload.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{decode_pdf_buffer, ExportRequest, UploadRequest, UploadResponse};
pub use routes::pitchdeck_routes;
