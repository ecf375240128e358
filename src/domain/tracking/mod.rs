//! Tracking of tool calls for progress display.

mod progress;
mod tool_call_tracker;

pub use progress::{description, display_name, progress_for, progress_steps, ProgressSnapshot, ProgressStep};
pub use tool_call_tracker::{ToolCallRecord, ToolCallTracker, TrackedStatus};
