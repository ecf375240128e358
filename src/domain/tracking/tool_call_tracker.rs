//! Tool-call tracker - display state for tool progress cards.
//!
//! Consumes stream events (or a message snapshot) and keeps an ordered list
//! of calls with their status and timing. At most one record is `running` at
//! a time: starting a new call closes the previous one.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::progress::{progress_for, ProgressSnapshot};
use crate::domain::chat::{Message, Role, ToolPartState, UiStreamEvent};
use crate::domain::foundation::{Timestamp, ToolCallId};

/// Display status of a tracked call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackedStatus {
    Running,
    Completed,
    Error,
}

/// One tool call as shown in the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRecord {
    pub id: ToolCallId,
    pub tool_name: String,
    pub status: TrackedStatus,
    pub start_time: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ToolCallRecord {
    fn close(&mut self, status: TrackedStatus, result: Option<Value>) {
        self.status = status;
        self.end_time = Some(Timestamp::now());
        if result.is_some() {
            self.result = result;
        }
    }

    /// Milliseconds between start and end (or now, while running).
    pub fn elapsed_ms(&self) -> u64 {
        self.end_time
            .unwrap_or_else(Timestamp::now)
            .millis_since(&self.start_time)
    }

    /// Progress phase for running calls of tools that report phases.
    pub fn progress(&self) -> Option<ProgressSnapshot> {
        match self.status {
            TrackedStatus::Running => progress_for(&self.tool_name, self.elapsed_ms()),
            _ => None,
        }
    }
}

/// Ordered list of tracked tool calls.
#[derive(Debug, Clone, Default)]
pub struct ToolCallTracker {
    records: Vec<ToolCallRecord>,
    processed_results: HashSet<ToolCallId>,
}

impl ToolCallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in start order.
    pub fn records(&self) -> &[ToolCallRecord] {
        &self.records
    }

    /// Looks up a record by call id.
    pub fn get(&self, id: &ToolCallId) -> Option<&ToolCallRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// The record currently running, if any.
    pub fn running(&self) -> Option<&ToolCallRecord> {
        self.records
            .iter()
            .find(|record| record.status == TrackedStatus::Running)
    }

    /// A call started.
    ///
    /// A known id is restarted in place. Otherwise any running record is
    /// completed first and a new running record is appended. Calls without
    /// an id get a generated one, which is returned.
    pub fn on_tool_call_started(&mut self, id: Option<ToolCallId>, tool_name: &str) -> ToolCallId {
        if let Some(existing) = id
            .as_ref()
            .and_then(|id| self.records.iter_mut().find(|record| &record.id == id))
        {
            existing.status = TrackedStatus::Running;
            existing.start_time = Timestamp::now();
            existing.end_time = None;
            return existing.id.clone();
        }

        for record in self
            .records
            .iter_mut()
            .filter(|record| record.status == TrackedStatus::Running)
        {
            record.close(TrackedStatus::Completed, None);
        }

        let id = id.unwrap_or_else(|| {
            ToolCallId::new(format!(
                "tool-{}-{}",
                Timestamp::now().as_datetime().timestamp_millis(),
                &Uuid::new_v4().simple().to_string()[..9]
            ))
        });
        self.records.push(ToolCallRecord {
            id: id.clone(),
            tool_name: tool_name.to_string(),
            status: TrackedStatus::Running,
            start_time: Timestamp::now(),
            end_time: None,
            result: None,
        });
        id
    }

    /// A result arrived for a call. Unknown ids are ignored.
    pub fn on_tool_result(&mut self, id: &ToolCallId, payload: Value) {
        if let Some(record) = self.records.iter_mut().find(|record| &record.id == id) {
            record.close(TrackedStatus::Completed, Some(payload));
        }
    }

    /// A single call failed before producing output.
    pub fn on_tool_error(&mut self, id: &ToolCallId, error_text: &str) {
        if let Some(record) = self.records.iter_mut().find(|record| &record.id == id) {
            record.close(
                TrackedStatus::Error,
                Some(serde_json::json!({ "error": error_text })),
            );
        }
    }

    /// The stream went idle: anything still running is closed as completed.
    pub fn on_stream_ready(&mut self) {
        self.close_running(TrackedStatus::Completed);
    }

    /// The stream failed: anything still running is marked as errored.
    pub fn on_stream_error(&mut self) {
        self.close_running(TrackedStatus::Error);
    }

    fn close_running(&mut self, status: TrackedStatus) {
        for record in self
            .records
            .iter_mut()
            .filter(|record| record.status == TrackedStatus::Running)
        {
            record.close(status, None);
        }
    }

    /// Forgets every record.
    pub fn reset(&mut self) {
        self.records.clear();
        self.processed_results.clear();
    }

    /// Applies one stream event.
    pub fn apply(&mut self, event: &UiStreamEvent) {
        match event {
            UiStreamEvent::ToolInputAvailable {
                tool_call_id,
                tool_name,
                ..
            } => {
                self.on_tool_call_started(Some(tool_call_id.clone()), tool_name);
            }
            UiStreamEvent::ToolOutputAvailable {
                tool_call_id,
                output,
            } => {
                self.processed_results.insert(tool_call_id.clone());
                self.on_tool_result(tool_call_id, output.clone());
            }
            UiStreamEvent::ToolOutputError {
                tool_call_id,
                error_text,
            } => {
                self.processed_results.insert(tool_call_id.clone());
                self.on_tool_error(tool_call_id, error_text);
            }
            UiStreamEvent::Finish { .. } => self.on_stream_ready(),
            UiStreamEvent::Error { .. } => self.on_stream_error(),
            _ => {}
        }
    }

    /// Catches up with a message snapshot.
    ///
    /// An empty list clears the tracker. Resolved tool parts in assistant
    /// messages complete their record once; repeated snapshots do not
    /// overwrite results already applied.
    pub fn reconcile(&mut self, messages: &[Message]) {
        if messages.is_empty() {
            self.reset();
            return;
        }

        for message in messages.iter().filter(|m| m.role == Role::Assistant) {
            for part in message.tool_parts() {
                if part.state != ToolPartState::OutputAvailable
                    || self.processed_results.contains(&part.tool_call_id)
                {
                    continue;
                }
                self.processed_results.insert(part.tool_call_id.clone());
                self.on_tool_result(
                    &part.tool_call_id,
                    part.output.clone().unwrap_or(Value::Null),
                );
            }
        }
    }
}
