//! Base agent definition.
//!
//! Defines the contract every analysis agent must satisfy. Agents are the
//! reasoning units of the runtime — they receive a context of verified
//! signals and return candidate root-cause hypotheses.
//!
//! Agents are deliberately "dumb" workers:
//! - They do not call other agents
//! - They do not store state between runs
//! - They do not modify signals
//!
//! All intelligence about scheduling, validation, and ranking lives in the
//! executor, judge, and aggregator layers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::hypothesis::Hypothesis;
use crate::incident::IncidentInput;
use crate::signal::Signal;

/// The input context passed to every agent at execution time.
///
/// Built by the runtime from `StructuredMemory` just before agents run, and
/// shared across all of them behind an `Arc`. Signal extraction completes
/// before any agent starts, so every agent sees the same consistent list,
/// and nothing mutates it during dispatch.
#[derive(Debug, Clone)]
pub struct AgentContext {
    /// Snapshot of the verified signals for this execution. Agents reason
    /// over these and cite their IDs in hypotheses.
    pub signals: Vec<Signal>,

    /// The original incident payload, for reference (e.g. deployment ID
    /// labelling). Agents should ground their reasoning in signals, not
    /// raw incident fields.
    pub incident: IncidentInput,
}

/// What an agent hands back to the executor: its hypotheses, attributed to
/// itself. The executor adds timing and the outcome status on top.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentResult {
    pub agent_name: String,

    /// Zero or more candidate root causes. Zero is valid — the agent found
    /// no signals relevant to its domain.
    pub hypotheses: Vec<Hypothesis>,
}

/// Contract for all analysis agents.
///
/// The runtime only ever interacts with agents through this trait —
/// concrete types never appear in the core pipeline. Any LLM client an
/// agent needs is injected at construction time, so the pipeline stays
/// provider-agnostic and tests can use stub agents with no network at all.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Unique identifier for this agent, e.g. "log_agent". Used as the
    /// registry key and for attribution in the judge and aggregator.
    fn name(&self) -> &str;

    /// Analyse the context and return candidate root causes.
    ///
    /// Returning `Err` (or panicking) is converted by the executor into a
    /// `Crashed` outcome for this agent only; the rest of the fan-out is
    /// unaffected.
    async fn run(&self, context: Arc<AgentContext>) -> Result<AgentResult>;
}
