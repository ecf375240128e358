//! Chat domain - UI messages and the streamed events that build them.

mod message;
mod ui_stream;

pub use message::{Message, Part, Role, ToolPart, ToolPartState};
pub use ui_stream::{UiStreamEvent, STREAM_DONE_MARKER, UI_STREAM_HEADER};
