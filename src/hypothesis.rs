//! Hypothesis schema.
//!
//! A hypothesis is a candidate root cause proposed by an agent, grounded in
//! cited signal IDs. The judge verifies the grounding; the aggregator merges
//! hypotheses from different agents that describe the same root cause.

use serde::{Deserialize, Serialize};

use crate::signal::Severity;

/// A candidate root cause proposed by one or more agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    /// Short name of the proposed root cause, e.g. "DB Connection Pool
    /// Exhaustion". Used by the aggregator for dedup matching.
    pub label: String,

    /// Longer explanation of the causal chain.
    pub description: String,

    /// Confidence in [0.0, 1.0]. After aggregation this is the final score
    /// (base confidence plus agreement bonus, clamped to 1.0).
    pub confidence: f64,

    pub severity: Severity,

    /// IDs of the signals that support this hypothesis. Must be non-empty
    /// and every ID must exist in memory, or the judge rejects the outcome.
    pub supporting_signals: Vec<String>,

    /// Names of the agents that produced this hypothesis. A single agent
    /// before aggregation; the deduplicated, sorted union after merging.
    pub contributing_agents: Vec<String>,
}
