//! Agent event schema.
//!
//! Events are emitted by the executor during execution so a display layer
//! can update live panels in real time. The runtime and any listener are
//! deliberately decoupled — the pipeline behaves identically whether or not
//! anything is listening.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Lifecycle stages the executor emits events for: one `Started` per
/// invocation, then exactly one of `Complete` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Started,
    Complete,
    Error,
}

/// A single runtime event emitted during agent execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub agent_name: String,
    pub event_type: EventType,

    /// Human-readable description of what happened at this moment,
    /// e.g. "analyzing..." or "2 hypotheses generated".
    pub message: String,

    /// Milliseconds since the start of the dispatch phase.
    pub timestamp_ms: f64,
}

/// Channel end the executor writes events into. Unbounded so a slow
/// listener can never stall the dispatch barrier.
pub type EventSink = mpsc::UnboundedSender<AgentEvent>;
