//! Pipeline runtime — the top-level orchestrator.
//!
//! `RcaRuntime` is the single entry point for the whole system. Callers
//! register agents once, then call `execute()` with an `IncidentInput` as
//! many times as needed. Each call is fully independent: fresh memory,
//! fresh context, fresh results. Two concurrent executions share no mutable
//! state, so isolation needs no locks.
//!
//! Pipeline order inside execute():
//! 1. Validate the payload (malformed input fails before any state exists)
//! 2. Create fresh `StructuredMemory` and run signal extraction into it
//! 3. Build the shared `AgentContext` snapshot
//! 4. Fan out all registered agents via `ParallelExecutor`
//! 5. Judge every outcome
//! 6. Aggregate accepted outcomes into the ranked list + review flag
//! 7. Record the ranking in memory and, if configured, synthesize a
//!    narrative
//!
//! Only steps before 2 can fail the run. Every stage failure after that is
//! contained per-agent or per-collaborator; the terminal state is always
//! reached.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::agent::{Agent, AgentContext};
use crate::aggregator::Aggregator;
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::events::EventSink;
use crate::executor::ParallelExecutor;
use crate::extract::SignalExtractor;
use crate::incident::IncidentInput;
use crate::judge::JudgeLayer;
use crate::memory::StructuredMemory;
use crate::registry::AgentRegistry;
use crate::result::ExecutionResult;
use crate::synthesis::Synthesizer;

/// Orchestrates the full agent pipeline for one incident input.
///
/// Holds a registry of agents and a fixed set of pipeline components,
/// created once at construction time and reused across all execute()
/// calls. The per-execution state (`StructuredMemory`) is created inside
/// execute() and dropped when it returns.
pub struct RcaRuntime {
    registry: AgentRegistry,
    executor: ParallelExecutor,
    judge: JudgeLayer,
    aggregator: Aggregator,
    extractor: Option<Arc<dyn SignalExtractor>>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
}

impl RcaRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            registry: AgentRegistry::new(),
            executor: ParallelExecutor::new(config.agent_timeout),
            judge: JudgeLayer::new(),
            aggregator: Aggregator::new(&config),
            extractor: None,
            synthesizer: None,
        }
    }

    /// Register an agent to participate in every execute() call.
    ///
    /// A duplicate name fails here, at setup time — ambiguous attribution
    /// would silently corrupt validation and aggregation mid-run.
    pub fn register(&mut self, agent: Arc<dyn Agent>) -> Result<()> {
        self.registry.register(agent)?;
        debug!("Registered agent. Total agents: {}.", self.registry.len());
        Ok(())
    }

    /// Attach the signal extraction collaborator. Without one, executions
    /// run with an empty signal list (and the judge rejects any agent that
    /// cites evidence, which is correct: no signals means no grounding).
    pub fn with_extractor(mut self, extractor: Arc<dyn SignalExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Attach the optional narrative collaborator.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn agent_count(&self) -> usize {
        self.registry.len()
    }

    /// Run the full pipeline for one incident and return ranked hypotheses.
    pub async fn execute(&self, payload: IncidentInput) -> Result<ExecutionResult> {
        self.execute_with_events(payload, None).await
    }

    /// Like `execute()`, but streams `AgentEvent`s into `events` so a
    /// display layer can render live progress. The pipeline behaves
    /// identically whether or not anything is listening.
    ///
    /// Dropping the returned future cancels every outstanding agent
    /// invocation before validation runs.
    pub async fn execute_with_events(
        &self,
        payload: IncidentInput,
        events: Option<EventSink>,
    ) -> Result<ExecutionResult> {
        // Fatal, pre-execution: reject before any state is created.
        payload.validate()?;

        let execution_id = ExecutionResult::new_execution_id();
        info!(
            "Starting execution {} for deployment '{}' with {} registered agents.",
            execution_id,
            payload.deployment_id,
            self.registry.len(),
        );

        // Fresh memory per run — never shared across calls.
        let mut memory = StructuredMemory::new();

        if let Some(extractor) = &self.extractor {
            let signals = extractor.extract(&payload);
            memory.add_signals(signals);
        }
        debug!("Signal extraction complete. {} signals in memory.", memory.signal_count());

        // Extraction finished before any agent runs, so every agent sees
        // the same snapshot and no writer overlaps the concurrent phase.
        let context = Arc::new(AgentContext {
            signals: memory.snapshot(),
            incident: payload,
        });

        let agents = self.registry.all();
        let total = agents.len();
        let outcomes = self.executor.execute(agents, context, events).await;
        info!("{}/{} agents produced outcomes.", outcomes.len(), total);

        let judged: Vec<_> = outcomes
            .into_iter()
            .map(|outcome| self.judge.validate(outcome, &memory))
            .collect();
        for result in judged.iter().filter(|j| !j.valid) {
            warn!(
                "Agent '{}' result rejected: {}",
                result.outcome.agent_name,
                result.rejection_reason.as_deref().unwrap_or("unknown"),
            );
        }
        let valid_count = judged.iter().filter(|j| j.valid).count();
        info!("{}/{} results passed judge validation.", valid_count, judged.len());

        let aggregation = self.aggregator.aggregate(&judged);
        info!("Aggregation complete. {} ranked hypotheses.", aggregation.ranked.len());

        // The only post-dispatch write: record the ranking for any
        // collaborator that reads memory after aggregation.
        memory.add_hypotheses(aggregation.ranked.clone());

        let synthesis = match &self.synthesizer {
            Some(synthesizer) => {
                match synthesizer
                    .summarize(&memory.snapshot(), &aggregation.ranked)
                    .await
                {
                    Ok(result) => Some(result),
                    Err(err) => {
                        // Contained: a narrative failure never aborts the run.
                        warn!("Synthesis failed, returning result without narrative: {err}");
                        None
                    }
                }
            }
            None => None,
        };

        Ok(ExecutionResult {
            execution_id,
            ranked_hypotheses: aggregation.ranked,
            signals_used: memory.snapshot(),
            requires_human_review: aggregation.requires_human_review,
            synthesis,
        })
    }
}
