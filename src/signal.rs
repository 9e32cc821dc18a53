//! Signal schema.
//!
//! Signals are deterministic facts extracted from an incident payload before
//! any agent runs. They represent verified observations, not interpretations.
//! Agents reason over signals — they never create or modify them.

use serde::{Deserialize, Serialize};

/// Impact level of a signal or hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A single verified fact extracted from an incident.
///
/// Signals are produced by the signal extraction layer and stored in
/// `StructuredMemory`. Agents receive the signal list as their input context,
/// and the judge cross-references hypothesis citations against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Unique per-execution identifier, assigned sequentially by the
    /// extractor (e.g. "sig_001"). Hypotheses cite these.
    pub id: String,

    /// Category of signal, e.g. "log_anomaly", "metric_spike",
    /// "commit_change", "config_change".
    pub kind: String,

    /// Human-readable description of what was observed.
    pub description: String,

    /// Optional numeric measurement. None for qualitative signals such as
    /// code or config changes with no meaningful scalar.
    pub value: Option<f64>,

    pub severity: Severity,

    /// Name of the extractor that produced this signal.
    pub source: String,
}
