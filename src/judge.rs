//! Judge layer.
//!
//! Validates `AgentOutcome` objects before they reach the aggregator. All
//! checks are deterministic — same inputs always produce the same verdict.
//! No LLM is involved, ever: probabilistic validation of probabilistic
//! output would make failed validations impossible to reason about.
//!
//! The judge reports verdicts; it does not decide what to do with them. A
//! rejected outcome is logged by the runtime and excluded from aggregation,
//! but never stops the pipeline.

use crate::memory::StructuredMemory;
use crate::result::{AgentOutcome, AgentStatus};

/// The verdict produced by the judge for a single outcome.
///
/// Wraps the outcome it judged without modifying it, so callers can always
/// log full context for a rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgedResult {
    pub valid: bool,
    pub outcome: AgentOutcome,

    /// Description of the first check that failed. None when valid.
    pub rejection_reason: Option<String>,
}

impl JudgedResult {
    fn accepted(outcome: AgentOutcome) -> Self {
        Self {
            valid: true,
            outcome,
            rejection_reason: None,
        }
    }

    fn rejected(outcome: AgentOutcome, reason: String) -> Self {
        Self {
            valid: false,
            outcome,
            rejection_reason: Some(reason),
        }
    }
}

/// Deterministic acceptance gate between dispatch and aggregation.
///
/// Crashed and timed-out outcomes are rejected outright. Everything else
/// runs through four ordered checks, short-circuiting on the first failure:
///
/// 1. The agent name is non-blank — an unattributable result cannot be
///    ranked or displayed.
/// 2. Every hypothesis cites at least one signal — zero citations is
///    ungrounded speculation. An outcome with zero hypotheses is valid.
/// 3. Every cited signal ID exists in memory — catches hallucinated IDs
///    before the aggregator treats ghost evidence as real.
/// 4. Every confidence is within [0.0, 1.0] — defense-in-depth in case a
///    hypothesis was constructed in a way that bypassed normal validation.
#[derive(Debug, Default, Clone)]
pub struct JudgeLayer;

impl JudgeLayer {
    pub fn new() -> Self {
        Self
    }

    /// Judge one outcome against the current memory. Side-effect free.
    pub fn validate(&self, outcome: AgentOutcome, memory: &StructuredMemory) -> JudgedResult {
        match outcome.status {
            AgentStatus::Crashed => {
                let detail = outcome.failure.clone().unwrap_or_else(|| "unknown error".to_string());
                let reason = format!("Agent '{}' crashed: {}", outcome.agent_name, detail);
                return JudgedResult::rejected(outcome, reason);
            }
            AgentStatus::TimedOut => {
                let reason = format!(
                    "Agent '{}' timed out after {:.0}ms.",
                    outcome.agent_name, outcome.execution_time_ms
                );
                return JudgedResult::rejected(outcome, reason);
            }
            AgentStatus::Success => {}
        }

        // Check 1 — attribution.
        if outcome.agent_name.trim().is_empty() {
            return JudgedResult::rejected(outcome, "agent_name is empty or whitespace.".to_string());
        }

        // Check 2 — every hypothesis is grounded in at least one citation.
        if let Some(ungrounded) = outcome
            .hypotheses
            .iter()
            .find(|h| h.supporting_signals.is_empty())
        {
            let reason = format!(
                "Hypothesis '{}' from agent '{}' has no supporting signals.",
                ungrounded.label, outcome.agent_name
            );
            return JudgedResult::rejected(outcome, reason);
        }

        // Check 3 — every cited signal ID exists. All unknown IDs are
        // collected so the rejection reason is actionable in one pass.
        let valid_ids = memory.signal_ids();
        let mut unknown: Vec<&str> = outcome
            .hypotheses
            .iter()
            .flat_map(|h| h.supporting_signals.iter())
            .map(String::as_str)
            .filter(|id| !valid_ids.contains(id))
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            unknown.dedup();
            let mut known: Vec<&str> = valid_ids.into_iter().collect();
            known.sort_unstable();
            let reason = format!(
                "Agent '{}' cites unknown signal ID(s) {:?}. Valid IDs: {:?}",
                outcome.agent_name, unknown, known
            );
            return JudgedResult::rejected(outcome, reason);
        }

        // Check 4 — confidence bounds.
        if let Some(out_of_range) = outcome
            .hypotheses
            .iter()
            .find(|h| !(0.0..=1.0).contains(&h.confidence))
        {
            let reason = format!(
                "Hypothesis '{}' from agent '{}' has invalid confidence {} (must be 0.0-1.0).",
                out_of_range.label, outcome.agent_name, out_of_range.confidence
            );
            return JudgedResult::rejected(outcome, reason);
        }

        JudgedResult::accepted(outcome)
    }
}
