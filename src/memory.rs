//! Structured memory for a single runtime execution.
//!
//! `StructuredMemory` is the typed, append-only store that lives for the
//! duration of one `RcaRuntime::execute()` call. It is created at the start
//! of execution, written to during signal extraction and after aggregation,
//! and read by the agents (via snapshot), the judge, and the synthesizer.
//!
//! It is not a database. It does not persist between runs. When execute()
//! returns, the memory is dropped. Two concurrent executions never share an
//! instance, so isolation is structural rather than lock-based.

use std::collections::HashSet;

use crate::hypothesis::Hypothesis;
use crate::signal::Signal;

/// Typed, append-only in-RAM store for one execution.
///
/// All writes are append-only — signals and hypotheses can be added but
/// never removed or modified. Agents therefore cannot tamper with signals
/// extracted before they ran, and the judge can trust that signal IDs are
/// stable for the whole run.
#[derive(Debug, Default)]
pub struct StructuredMemory {
    signals: Vec<Signal>,
    hypotheses: Vec<Hypothesis>,
}

impl StructuredMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_signal(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    /// Append multiple signals in one call. An empty list is fine.
    pub fn add_signals(&mut self, signals: Vec<Signal>) {
        self.signals.extend(signals);
    }

    pub fn add_hypothesis(&mut self, hypothesis: Hypothesis) {
        self.hypotheses.push(hypothesis);
    }

    pub fn add_hypotheses(&mut self, hypotheses: Vec<Hypothesis>) {
        self.hypotheses.extend(hypotheses);
    }

    /// All signals currently in memory, as an owned copy. Callers can do
    /// what they like with the returned list without touching memory state.
    pub fn snapshot(&self) -> Vec<Signal> {
        self.signals.clone()
    }

    pub fn hypotheses(&self) -> Vec<Hypothesis> {
        self.hypotheses.clone()
    }

    /// The set of all signal IDs currently in memory.
    ///
    /// Used by the judge to cross-reference cited IDs in O(1) per lookup.
    pub fn signal_ids(&self) -> HashSet<&str> {
        self.signals.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Severity;

    fn signal(id: &str) -> Signal {
        Signal {
            id: id.to_string(),
            kind: "metric_spike".to_string(),
            description: "latency p99 elevated".to_string(),
            value: Some(950.0),
            severity: Severity::High,
            source: "metrics_analyzer".to_string(),
        }
    }

    #[test]
    fn snapshot_is_a_defensive_copy() {
        let mut memory = StructuredMemory::new();
        memory.add_signal(signal("sig_001"));

        let mut snap = memory.snapshot();
        snap.clear();
        snap.push(signal("sig_999"));

        assert_eq!(memory.signal_count(), 1);
        assert!(memory.signal_ids().contains("sig_001"));
        assert!(!memory.signal_ids().contains("sig_999"));
    }

    #[test]
    fn signal_ids_cover_all_appended_signals() {
        let mut memory = StructuredMemory::new();
        memory.add_signals(vec![signal("sig_001"), signal("sig_002")]);

        let ids = memory.signal_ids();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("sig_001"));
        assert!(ids.contains("sig_002"));
    }

    #[test]
    fn starts_empty() {
        let memory = StructuredMemory::new();
        assert_eq!(memory.signal_count(), 0);
        assert!(memory.snapshot().is_empty());
        assert!(memory.hypotheses().is_empty());
    }
}
