//! Agent registry.
//!
//! The runtime's roster of agents. It enforces one invariant: agent names
//! must be unique. Two agents with the same name would make judge
//! attribution and aggregator merging ambiguous, so duplicate registration
//! is rejected immediately at setup time — never mid-execution.

use std::collections::HashMap;
use std::sync::Arc;

use crate::agent::Agent;
use crate::error::{RcaError, Result};

/// Tracks registered agents and provides lookup by name.
///
/// Holds no execution state. Each `RcaRuntime` owns its own registry, so
/// concurrent runtimes are structurally isolated.
#[derive(Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
    // Registration order, so dispatch and logs are stable across runs.
    order: Vec<String>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under its unique name.
    ///
    /// Fails with `RcaError::DuplicateAgent` if the name is taken. The
    /// registry is left unchanged on failure.
    pub fn register(&mut self, agent: Arc<dyn Agent>) -> Result<()> {
        let name = agent.name().to_string();
        if self.agents.contains_key(&name) {
            return Err(RcaError::DuplicateAgent(name));
        }
        self.order.push(name.clone());
        self.agents.insert(name, agent);
        Ok(())
    }

    /// All registered agents in registration order, as a defensive copy.
    pub fn all(&self) -> Vec<Arc<dyn Agent>> {
        self.order
            .iter()
            .filter_map(|name| self.agents.get(name).cloned())
            .collect()
    }

    /// Look up an agent by name. Absence is a normal query result, not an
    /// error — the caller decides how to handle it.
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentContext, AgentResult};
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Agent for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(&self, _context: Arc<AgentContext>) -> crate::error::Result<AgentResult> {
            Ok(AgentResult {
                agent_name: self.0.to_string(),
                hypotheses: vec![],
            })
        }
    }

    #[test]
    fn rejects_duplicate_names_at_setup() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(Named("log_agent"))).unwrap();

        let err = registry.register(Arc::new(Named("log_agent"))).unwrap_err();
        assert!(matches!(err, RcaError::DuplicateAgent(name) if name == "log_agent"));

        // Registry stays usable after the rejection.
        registry.register(Arc::new(Named("metrics_agent"))).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn all_preserves_registration_order() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(Named("metrics_agent"))).unwrap();
        registry.register(Arc::new(Named("log_agent"))).unwrap();
        registry.register(Arc::new(Named("commit_agent"))).unwrap();

        let names: Vec<String> = registry.all().iter().map(|a| a.name().to_string()).collect();
        assert_eq!(names, vec!["metrics_agent", "log_agent", "commit_agent"]);
    }

    #[test]
    fn by_name_returns_none_for_unknown() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(Named("log_agent"))).unwrap();

        assert!(registry.by_name("log_agent").is_some());
        assert!(registry.by_name("config_agent").is_none());
    }
}
