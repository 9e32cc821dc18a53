//! Incident input schema.
//!
//! Defines the structured payload that enters the runtime. This is the
//! contract between the data ingestion layer and the pipeline. Signal
//! extraction reads this payload and converts it into typed `Signal`
//! objects before any agent sees the data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RcaError, Result};

/// A single commit observed in the deployment window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
    pub diff_summary: String,
}

/// Raw incident payload received at the start of a runtime execution.
///
/// This is the only external input to the system. Everything downstream
/// (signals, hypotheses, ranked output) is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentInput {
    /// Identifier of the deployment that triggered the incident
    /// (e.g. "deploy-2024-11-15-v2.3.1").
    pub deployment_id: String,

    /// Raw log lines from the error-tracking integration.
    #[serde(default)]
    pub logs: Vec<String>,

    /// Performance and resource metrics, current values and baselines.
    #[serde(default)]
    pub metrics: HashMap<String, Value>,

    /// Commits in the deployment window.
    #[serde(default)]
    pub recent_commits: Vec<CommitInfo>,

    /// Key-value config state at the deploy SHA.
    #[serde(default)]
    pub config_snapshot: HashMap<String, Value>,
}

impl IncidentInput {
    /// Check that the payload is well-formed enough to start an execution.
    ///
    /// A malformed payload is a fatal, pre-execution failure: it is rejected
    /// before any memory or context is created, so no partial state exists.
    pub fn validate(&self) -> Result<()> {
        if self.deployment_id.trim().is_empty() {
            return Err(RcaError::InvalidInput(
                "deployment_id is empty or whitespace".to_string(),
            ));
        }
        Ok(())
    }
}
