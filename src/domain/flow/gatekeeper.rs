//! Step gatekeeper for full-flow sessions.
//!
//! The model is free to call tools in any order, or skip them. In full-flow
//! mode the orchestrator narrows the available tools to a single one per
//! step, chosen by [`next_allowed_tool`] from the steps already taken.

use std::collections::HashSet;

use crate::domain::foundation::ToolCallId;
use crate::domain::tools::ToolAvailability;

/// Fixed order of tools executed by a full-flow session.
pub const FULL_FLOW_SEQUENCE: [&str; 9] = [
    "marketSearch",
    "generateBranding",
    "generateLegalDocs",
    "storeLink",
    "mailSetup",
    "phoneassistant",
    "influencerSearch",
    "generateBrandingVideo",
    "generatePitchDeck",
];

/// Name and id of a call or result observed during a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepToolRef {
    pub tool_call_id: ToolCallId,
    pub tool_name: String,
}

impl StepToolRef {
    pub fn new(tool_call_id: ToolCallId, tool_name: impl Into<String>) -> Self {
        Self {
            tool_call_id,
            tool_name: tool_name.into(),
        }
    }
}

/// One model-invocation round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    pub tool_calls: Vec<StepToolRef>,
    pub tool_results: Vec<StepToolRef>,
}

impl Step {
    /// True when the model asked for no tools in this round.
    pub fn is_complete_turn(&self) -> bool {
        self.tool_calls.is_empty()
    }
}

/// Steps taken so far within one request, in order.
///
/// Owned by the orchestrator's step loop and dropped with the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepHistory {
    steps: Vec<Step>,
}

impl StepHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finished step.
    pub fn record(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps taken.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True before the first step finishes.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Names of every tool called or resulted across the given steps.
pub fn used_tools(prior_steps: &[Step]) -> HashSet<&str> {
    prior_steps
        .iter()
        .flat_map(|step| step.tool_calls.iter().chain(step.tool_results.iter()))
        .map(|tool| tool.tool_name.as_str())
        .collect()
}

/// First entry of `sequence` not yet used in `prior_steps`.
///
/// Returns `None` once every entry has been used, meaning no restriction.
pub fn next_allowed_tool<'a>(prior_steps: &[Step], sequence: &[&'a str]) -> Option<&'a str> {
    let used = used_tools(prior_steps);
    sequence.iter().copied().find(|name| !used.contains(name))
}

/// How tool availability is decided for each step of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Every tool on every step.
    Unrestricted,
    /// One tool per step, following [`FULL_FLOW_SEQUENCE`].
    FullFlow,
}

impl StepPolicy {
    /// Availability for the step following `history`.
    pub fn availability(&self, history: &StepHistory) -> ToolAvailability {
        match self {
            StepPolicy::Unrestricted => ToolAvailability::All,
            StepPolicy::FullFlow => match next_allowed_tool(history.steps(), &FULL_FLOW_SEQUENCE) {
                Some(name) => ToolAvailability::Only(name.to_string()),
                None => ToolAvailability::All,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn completed_step(name: &str) -> Step {
        let id = ToolCallId::new(format!("call_{}", name));
        Step {
            tool_calls: vec![StepToolRef::new(id.clone(), name)],
            tool_results: vec![StepToolRef::new(id, name)],
        }
    }

    #[test]
    fn empty_history_allows_market_search_first() {
        assert_eq!(next_allowed_tool(&[], &FULL_FLOW_SEQUENCE), Some("marketSearch"));
    }

    #[test]
    fn completed_market_search_allows_branding() {
        let steps = vec![completed_step("marketSearch")];
        assert_eq!(next_allowed_tool(&steps, &FULL_FLOW_SEQUENCE), Some("generateBranding"));
    }

    #[test]
    fn all_nine_used_lifts_restriction() {
        let steps: Vec<Step> = FULL_FLOW_SEQUENCE.iter().map(|name| completed_step(name)).collect();
        assert_eq!(next_allowed_tool(&steps, &FULL_FLOW_SEQUENCE), None);
    }

    #[test]
    fn call_without_result_still_counts_as_used() {
        let steps = vec![Step {
            tool_calls: vec![StepToolRef::new(ToolCallId::new("c1"), "marketSearch")],
            tool_results: vec![],
        }];
        assert_eq!(next_allowed_tool(&steps, &FULL_FLOW_SEQUENCE), Some("generateBranding"));
    }

    #[test]
    fn out_of_order_use_skips_used_entries() {
        let steps = vec![completed_step("storeLink"), completed_step("marketSearch")];
        assert_eq!(next_allowed_tool(&steps, &FULL_FLOW_SEQUENCE), Some("generateBranding"));

        let steps = vec![completed_step("marketSearch"), completed_step("generateBranding")];
        assert_eq!(next_allowed_tool(&steps, &FULL_FLOW_SEQUENCE), Some("generateLegalDocs"));
    }

    #[test]
    fn tools_outside_sequence_are_ignored() {
        let steps = vec![completed_step("addProduct")];
        assert_eq!(next_allowed_tool(&steps, &FULL_FLOW_SEQUENCE), Some("marketSearch"));
    }

    #[test]
    fn policy_maps_decision_to_availability() {
        let mut history = StepHistory::new();
        assert_eq!(
            StepPolicy::FullFlow.availability(&history),
            ToolAvailability::Only("marketSearch".to_string())
        );
        assert_eq!(StepPolicy::Unrestricted.availability(&history), ToolAvailability::All);

        for name in FULL_FLOW_SEQUENCE {
            history.record(completed_step(name));
        }
        assert_eq!(StepPolicy::FullFlow.availability(&history), ToolAvailability::All);
    }

    proptest! {
        #[test]
        fn next_tool_is_first_unused_prefix_entry(done in 0usize..=9) {
            let steps: Vec<Step> = FULL_FLOW_SEQUENCE[..done]
                .iter()
                .map(|name| completed_step(name))
                .collect();
            let expected = FULL_FLOW_SEQUENCE.get(done).copied();
            prop_assert_eq!(next_allowed_tool(&steps, &FULL_FLOW_SEQUENCE), expected);
        }

        #[test]
        fn next_tool_is_never_already_used(
            used in proptest::collection::hash_set(0usize..9, 0..9),
        ) {
            let steps: Vec<Step> = used.iter().map(|i| completed_step(FULL_FLOW_SEQUENCE[*i])).collect();
            if let Some(next) = next_allowed_tool(&steps, &FULL_FLOW_SEQUENCE) {
                let index = FULL_FLOW_SEQUENCE.iter().position(|n| *n == next).unwrap();
                prop_assert!(!used.contains(&index));
                prop_assert!((0..index).all(|i| used.contains(&i)));
            } else {
                prop_assert_eq!(used.len(), 9);
            }
        }
    }
}
