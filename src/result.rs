//! Result schemas.
//!
//! Defines the output types for individual agent invocations
//! (`AgentOutcome`) and the full pipeline execution (`ExecutionResult`).
//! These are the types that flow through the judge and aggregator layers
//! before reaching the caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hypothesis::Hypothesis;
use crate::signal::Signal;

/// How a single agent invocation resolved.
///
/// The executor converts every fault into one of these tags — it never lets
/// an exception cross the task boundary. Exactly one tag per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Success,
    Crashed,
    TimedOut,
}

/// The recorded result of one agent invocation.
///
/// Produced by `ParallelExecutor` — one per registered agent, regardless of
/// how the invocation ended. Timing is measured by the executor, not the
/// agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub agent_name: String,

    /// Candidate root causes. Empty on failure, and possibly empty on
    /// success (the agent found nothing relevant to its domain).
    pub hypotheses: Vec<Hypothesis>,

    /// Wall-clock time of the invocation in milliseconds. For a timed-out
    /// agent this equals the configured deadline.
    pub execution_time_ms: f64,

    pub status: AgentStatus,

    /// Failure detail for crashed agents (error or panic message).
    pub failure: Option<String>,
}

impl AgentOutcome {
    pub fn success(agent_name: String, hypotheses: Vec<Hypothesis>, elapsed_ms: f64) -> Self {
        Self {
            agent_name,
            hypotheses,
            execution_time_ms: elapsed_ms,
            status: AgentStatus::Success,
            failure: None,
        }
    }

    pub fn crashed(agent_name: String, elapsed_ms: f64, detail: String) -> Self {
        Self {
            agent_name,
            hypotheses: Vec::new(),
            execution_time_ms: elapsed_ms,
            status: AgentStatus::Crashed,
            failure: Some(detail),
        }
    }

    pub fn timed_out(agent_name: String, deadline_ms: f64) -> Self {
        Self {
            agent_name,
            hypotheses: Vec::new(),
            execution_time_ms: deadline_ms,
            status: AgentStatus::TimedOut,
            failure: None,
        }
    }
}

/// Narrative summary generated after hypothesis aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// Plain-English 2-3 sentence explanation of the incident.
    pub summary: String,

    /// Single most likely root cause identified from the ranking.
    pub key_finding: String,

    /// Confidence that the ranked order is correct, in [0.0, 1.0].
    pub confidence_in_ranking: f64,
}

/// Final output of a complete pipeline run.
///
/// The only object that crosses the runtime boundary to the outside world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// UUID for this run, for logging and correlating with incidents.
    pub execution_id: String,

    /// Hypotheses sorted by final score descending, truncated to the
    /// configured cap.
    pub ranked_hypotheses: Vec<Hypothesis>,

    /// All signals that were in memory during the run, for auditability —
    /// callers can trace which facts drove the ranking.
    pub signals_used: Vec<Signal>,

    /// True if the result should not be acted on automatically: the top
    /// score is below the review threshold, some outcome was rejected, or
    /// no hypothesis survived.
    pub requires_human_review: bool,

    /// Narrative explanation of the ranking, if a synthesizer was attached.
    pub synthesis: Option<SynthesisResult>,
}

impl ExecutionResult {
    pub fn new_execution_id() -> String {
        Uuid::new_v4().to_string()
    }
}
