//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, timestamps, errors)
//! - `chat` - UI messages, tool parts and stream events
//! - `tools` - Tool trait, result envelope and registry
//! - `flow` - Full-flow detection and the per-step tool gate
//! - `parsing` - Tiered recovery of JSON from model output
//! - `tracking` - Tool-call progress tracking for display
//! - `pitch_deck` - Slide model and normalization

pub mod chat;
pub mod flow;
pub mod foundation;
pub mod parsing;
pub mod pitch_deck;
pub mod tools;
pub mod tracking;
