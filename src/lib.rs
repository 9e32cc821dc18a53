//! Incident root-cause analysis runtime.
//!
//! Coordinates a fixed set of independent analysis agents over a shared
//! snapshot of verified signals, validates their outputs deterministically,
//! and merges them into a single ranked, confidence-weighted result.
//!
//! Pipeline: incident payload → signal extraction → `StructuredMemory` →
//! parallel agent dispatch → judge validation → aggregation → optional
//! narrative synthesis → `ExecutionResult`.

pub mod agent;
pub mod aggregator;
pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod extract;
pub mod hypothesis;
pub mod incident;
pub mod judge;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod registry;
pub mod result;
pub mod runtime;
pub mod signal;
pub mod synthesis;

pub use agent::{Agent, AgentContext, AgentResult};
pub use config::RuntimeConfig;
pub use error::{RcaError, Result};
pub use hypothesis::Hypothesis;
pub use incident::{CommitInfo, IncidentInput};
pub use result::{AgentOutcome, AgentStatus, ExecutionResult, SynthesisResult};
pub use runtime::RcaRuntime;
pub use signal::{Severity, Signal};
