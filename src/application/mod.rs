//! Application layer - request orchestration.
//!
//! - `orchestrator` - the multi-step streaming chat loop
//! - `history` - UI history to provider messages
//! - `system_prompt` - assistant instructions

mod history;
mod orchestrator;
mod system_prompt;

pub use history::to_model_messages;
pub use orchestrator::{ChatOrchestrator, ChatRequest};
pub use system_prompt::SYSTEM_PROMPT;
