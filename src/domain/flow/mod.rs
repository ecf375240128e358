//! Flow control for multi-step requests: full-flow detection and the
//! per-step tool gate.

mod full_flow;
mod gatekeeper;

pub use full_flow::{detect_full_flow, is_full_flow_request};
pub use gatekeeper::{
    next_allowed_tool, used_tools, Step, StepHistory, StepPolicy, StepToolRef, FULL_FLOW_SEQUENCE,
};
