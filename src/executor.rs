//! Parallel agent executor.
//!
//! Runs all registered agents concurrently and collects one `AgentOutcome`
//! per agent — never fewer, regardless of failures. Timeouts, panics, and
//! agent errors are converted into tagged outcome values (`TimedOut`,
//! `Crashed`) inside a supervising wrapper; nothing propagates across the
//! task boundary, so one agent failing can never cancel or block the rest.
//!
//! The executor owns timing: it measures wall-clock time around each
//! invocation and writes it into the outcome, so agents never track their
//! own timing. `execute()` returns only after every launched invocation has
//! resolved — the judge never sees a partial set.
//!
//! Whole-execution cancellation is structural: dropping the `execute()`
//! future drops the `JoinSet`, which aborts every outstanding invocation.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::agent::{Agent, AgentContext};
use crate::events::{AgentEvent, EventSink, EventType};
use crate::result::AgentOutcome;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs a list of agents concurrently and returns their outcomes.
#[derive(Debug, Clone)]
pub struct ParallelExecutor {
    /// Per-agent deadline. An agent that exceeds it is cancelled and
    /// recorded as `TimedOut`; the remaining agents continue.
    timeout: Duration,
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ParallelExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Dispatch all agents at once and wait for every invocation to resolve.
    ///
    /// Returns exactly one outcome per agent, sorted by agent name so the
    /// result is independent of completion order. The optional `events`
    /// sink receives STARTED/COMPLETE/ERROR events for a display layer; if
    /// it is `None` (or the receiver is gone) events are silently skipped.
    pub async fn execute(
        &self,
        agents: Vec<Arc<dyn Agent>>,
        context: Arc<AgentContext>,
        events: Option<EventSink>,
    ) -> Vec<AgentOutcome> {
        if agents.is_empty() {
            return Vec::new();
        }

        let exec_start = Instant::now();
        let mut set = JoinSet::new();

        for agent in agents {
            let context = Arc::clone(&context);
            let events = events.clone();
            let timeout = self.timeout;
            set.spawn(async move { supervise(agent, context, events, timeout, exec_start).await });
        }

        // Join barrier: every task resolves to an outcome value before the
        // judge runs. A JoinError here can only mean the task was aborted
        // (whole-execution cancellation), since panics are caught inside
        // supervise().
        let mut outcomes = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => error!("Agent task did not resolve: {err}"),
            }
        }

        outcomes.sort_by(|a, b| a.agent_name.cmp(&b.agent_name));
        info!(
            "Dispatch complete: {} outcomes in {:.0}ms",
            outcomes.len(),
            exec_start.elapsed().as_secs_f64() * 1000.0
        );
        outcomes
    }
}

/// Run a single agent with timeout and fault containment.
///
/// This function never panics and never returns early without an outcome.
/// All failure modes collapse into the tagged status on `AgentOutcome`.
async fn supervise(
    agent: Arc<dyn Agent>,
    context: Arc<AgentContext>,
    events: Option<EventSink>,
    timeout: Duration,
    exec_start: Instant,
) -> AgentOutcome {
    let name = agent.name().to_string();
    emit(&events, &name, EventType::Started, "analyzing...", exec_start);

    let started = Instant::now();
    let invocation = AssertUnwindSafe(agent.run(context)).catch_unwind();

    match tokio::time::timeout(timeout, invocation).await {
        // Deadline exceeded — the invocation future is dropped (cancelled)
        // and elapsed time is recorded as the deadline itself.
        Err(_) => {
            let deadline_ms = timeout.as_secs_f64() * 1000.0;
            warn!(
                "Agent '{}' timed out after {:.1}s — recording timed_out outcome.",
                name,
                timeout.as_secs_f64()
            );
            emit(
                &events,
                &name,
                EventType::Error,
                &format!("timed out after {:.1}s", timeout.as_secs_f64()),
                exec_start,
            );
            AgentOutcome::timed_out(name, deadline_ms)
        }

        Ok(Err(panic)) => {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            let detail = panic_message(panic);
            error!("Agent '{}' panicked after {:.0}ms: {}", name, elapsed_ms, detail);
            emit(&events, &name, EventType::Error, &detail, exec_start);
            AgentOutcome::crashed(name, elapsed_ms, detail)
        }

        Ok(Ok(Err(err))) => {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            let detail = err.to_string();
            error!("Agent '{}' failed after {:.0}ms: {}", name, elapsed_ms, detail);
            emit(&events, &name, EventType::Error, &detail, exec_start);
            AgentOutcome::crashed(name, elapsed_ms, detail)
        }

        Ok(Ok(Ok(result))) => {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            let count = result.hypotheses.len();
            let noun = if count == 1 { "hypothesis" } else { "hypotheses" };
            debug!("Agent '{}' completed in {:.0}ms with {} {}", name, elapsed_ms, count, noun);
            emit(
                &events,
                &name,
                EventType::Complete,
                &format!("{count} {noun} generated"),
                exec_start,
            );
            AgentOutcome::success(name, result.hypotheses, elapsed_ms)
        }
    }
}

fn emit(events: &Option<EventSink>, agent: &str, event_type: EventType, message: &str, exec_start: Instant) {
    if let Some(sink) = events {
        let event = AgentEvent {
            agent_name: agent.to_string(),
            event_type,
            message: message.to_string(),
            timestamp_ms: exec_start.elapsed().as_secs_f64() * 1000.0,
        };
        // A closed receiver just means nobody is watching.
        let _ = sink.send(event);
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "agent panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentResult;
    use crate::error::RcaError;
    use crate::hypothesis::Hypothesis;
    use crate::incident::IncidentInput;
    use crate::result::AgentStatus;
    use crate::signal::Severity;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn context() -> Arc<AgentContext> {
        Arc::new(AgentContext {
            signals: vec![],
            incident: IncidentInput {
                deployment_id: "deploy-test".to_string(),
                logs: vec![],
                metrics: HashMap::new(),
                recent_commits: vec![],
                config_snapshot: HashMap::new(),
            },
        })
    }

    fn hypothesis(label: &str, agent: &str) -> Hypothesis {
        Hypothesis {
            label: label.to_string(),
            description: String::new(),
            confidence: 0.8,
            severity: Severity::High,
            supporting_signals: vec!["sig_001".to_string()],
            contributing_agents: vec![agent.to_string()],
        }
    }

    struct Healthy;
    struct Failing;
    struct Panicking;
    struct Sleepy;

    #[async_trait]
    impl Agent for Healthy {
        fn name(&self) -> &str {
            "healthy_agent"
        }
        async fn run(&self, _ctx: Arc<AgentContext>) -> crate::error::Result<AgentResult> {
            Ok(AgentResult {
                agent_name: "healthy_agent".to_string(),
                hypotheses: vec![hypothesis("Error Rate Spike", "healthy_agent")],
            })
        }
    }

    #[async_trait]
    impl Agent for Failing {
        fn name(&self) -> &str {
            "failing_agent"
        }
        async fn run(&self, _ctx: Arc<AgentContext>) -> crate::error::Result<AgentResult> {
            Err(RcaError::Llm("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl Agent for Panicking {
        fn name(&self) -> &str {
            "panicking_agent"
        }
        async fn run(&self, _ctx: Arc<AgentContext>) -> crate::error::Result<AgentResult> {
            panic!("index out of bounds");
        }
    }

    #[async_trait]
    impl Agent for Sleepy {
        fn name(&self) -> &str {
            "sleepy_agent"
        }
        async fn run(&self, _ctx: Arc<AgentContext>) -> crate::error::Result<AgentResult> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(AgentResult {
                agent_name: "sleepy_agent".to_string(),
                hypotheses: vec![],
            })
        }
    }

    #[tokio::test]
    async fn one_outcome_per_agent_regardless_of_failures() {
        let executor = ParallelExecutor::new(Duration::from_millis(100));
        let agents: Vec<Arc<dyn Agent>> = vec![
            Arc::new(Healthy),
            Arc::new(Failing),
            Arc::new(Panicking),
            Arc::new(Sleepy),
        ];

        let outcomes = executor.execute(agents, context(), None).await;
        assert_eq!(outcomes.len(), 4);

        let status_of = |name: &str| {
            outcomes
                .iter()
                .find(|o| o.agent_name == name)
                .map(|o| o.status)
                .unwrap()
        };
        assert_eq!(status_of("healthy_agent"), AgentStatus::Success);
        assert_eq!(status_of("failing_agent"), AgentStatus::Crashed);
        assert_eq!(status_of("panicking_agent"), AgentStatus::Crashed);
        assert_eq!(status_of("sleepy_agent"), AgentStatus::TimedOut);
    }

    #[tokio::test]
    async fn failure_does_not_alter_another_agents_result() {
        let executor = ParallelExecutor::new(Duration::from_millis(100));
        let agents: Vec<Arc<dyn Agent>> = vec![Arc::new(Panicking), Arc::new(Healthy)];

        let outcomes = executor.execute(agents, context(), None).await;
        let healthy = outcomes
            .iter()
            .find(|o| o.agent_name == "healthy_agent")
            .unwrap();

        assert_eq!(healthy.status, AgentStatus::Success);
        assert_eq!(healthy.hypotheses.len(), 1);
        assert_eq!(healthy.hypotheses[0].label, "Error Rate Spike");
    }

    #[tokio::test]
    async fn timed_out_elapsed_equals_deadline() {
        let executor = ParallelExecutor::new(Duration::from_millis(50));
        let outcomes = executor
            .execute(vec![Arc::new(Sleepy)], context(), None)
            .await;

        assert_eq!(outcomes[0].status, AgentStatus::TimedOut);
        assert_eq!(outcomes[0].execution_time_ms, 50.0);
    }

    #[tokio::test]
    async fn crashed_outcome_carries_failure_detail() {
        let executor = ParallelExecutor::default();
        let outcomes = executor
            .execute(vec![Arc::new(Failing)], context(), None)
            .await;

        let detail = outcomes[0].failure.as_deref().unwrap();
        assert!(detail.contains("connection refused"));
    }

    #[tokio::test]
    async fn emits_started_and_terminal_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let executor = ParallelExecutor::new(Duration::from_millis(100));
        executor
            .execute(vec![Arc::new(Healthy)], context(), Some(tx))
            .await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.event_type, EventType::Started);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.event_type, EventType::Complete);
        assert!(second.message.contains("1 hypothesis"));
    }

    #[tokio::test]
    async fn empty_agent_list_yields_empty_outcomes() {
        let executor = ParallelExecutor::default();
        let outcomes = executor.execute(vec![], context(), None).await;
        assert!(outcomes.is_empty());
    }
}
