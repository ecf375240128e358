//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the state machine trait and error types
//! used across the chat, tool and flow modules.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DeckId, ToolCallId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
