//! Signal extraction seam.
//!
//! Domain-specific analyzers (logs, metrics, commits, config) live outside
//! the core engine. The runtime only needs this trait: a pure function from
//! the incident payload to a list of verified signals, run exactly once
//! before dispatch.

use crate::incident::IncidentInput;
use crate::signal::Signal;

/// Converts a raw incident payload into verified signals.
///
/// Implementations must be deterministic and side-effect free, and must
/// assign sequential, unique IDs (see `assign_sequential_ids`). Extraction
/// runs to completion before any agent starts, so every agent sees the same
/// consistent signal list.
pub trait SignalExtractor: Send + Sync {
    fn extract(&self, incident: &IncidentInput) -> Vec<Signal>;
}

/// Overwrite the IDs of `signals` with the sequential scheme "sig_001",
/// "sig_002", ... so extractor implementations composed of independent
/// analyzers don't need to coordinate ID ranges.
pub fn assign_sequential_ids(signals: &mut [Signal]) {
    for (i, signal) in signals.iter_mut().enumerate() {
        signal.id = format!("sig_{:03}", i + 1);
    }
}
