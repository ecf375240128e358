//! Full-flow detection.
//!
//! A request runs in full-flow mode when the latest user message asks for
//! the whole setup ("full flow", "complete setup", "end-to-end", "all steps",
//! "run everything"). Matching is case-insensitive and treats the separators
//! as optional whitespace or hyphens.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::chat::{Message, Role};

static FULL_FLOW_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)full\s*flow|complete\s*setup|end[-\s]?to[-\s]?end|all\s*steps|run\s*everything")
        .expect("full-flow pattern is a valid regex")
});

/// Returns true when the most recent user message requests the full flow.
///
/// Histories without a user message never trigger it.
pub fn detect_full_flow(messages: &[Message]) -> bool {
    messages
        .iter()
        .rev()
        .find(|message| message.role == Role::User)
        .map(|message| is_full_flow_request(&message.text()))
        .unwrap_or(false)
}

/// Pattern check on a single piece of text.
pub fn is_full_flow_request(text: &str) -> bool {
    FULL_FLOW_PATTERN.is_match(text)
}
