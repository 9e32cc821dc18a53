//! Narrative synthesis.
//!
//! Runs after aggregation and explains the ranking in plain English. It
//! never introduces new hypotheses — the return type cannot carry any — and
//! a synthesis failure never aborts the run; the runtime logs it and
//! returns the result without a narrative.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::error::{RcaError, Result};
use crate::hypothesis::Hypothesis;
use crate::llm::{parse_llm_json, LlmClient};
use crate::result::SynthesisResult;
use crate::signal::Signal;

/// Post-aggregation narrative collaborator.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn summarize(
        &self,
        signals: &[Signal],
        ranked: &[Hypothesis],
    ) -> Result<SynthesisResult>;
}

const SYSTEM_PROMPT: &str = "You are an SRE incident analyst. You are given the verified signals \
from an incident and a ranked list of root-cause hypotheses produced by independent analysis \
agents. Explain the ranking in plain English for an on-call engineer. Do not invent new root \
causes. Respond with only a JSON object: {\"summary\": \"2-3 sentence explanation\", \
\"key_finding\": \"single most likely root cause\", \"confidence_in_ranking\": 0.0-1.0}";

#[derive(Debug, Deserialize)]
struct SynthesisReply {
    summary: String,
    key_finding: String,
    confidence_in_ranking: f64,
}

/// LLM-backed synthesizer with deterministic fallbacks.
///
/// An empty ranking short-circuits without an LLM call; an unparseable
/// model reply degrades to a summary built from the top hypothesis.
pub struct SynthesisAgent {
    llm: Arc<dyn LlmClient>,
}

impl SynthesisAgent {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Synthesizer for SynthesisAgent {
    async fn summarize(
        &self,
        signals: &[Signal],
        ranked: &[Hypothesis],
    ) -> Result<SynthesisResult> {
        if ranked.is_empty() {
            return Ok(SynthesisResult {
                summary: "No validated hypotheses were produced from the current signal set. \
                          A human should review logs, metrics, and recent changes directly."
                    .to_string(),
                key_finding: "Insufficient evidence to identify a likely root cause.".to_string(),
                confidence_in_ranking: 0.0,
            });
        }

        let user_message = format!(
            "Signals:\n{}\n\nRanked hypotheses:\n{}",
            serde_json::to_string_pretty(signals)?,
            serde_json::to_string_pretty(ranked)?,
        );

        let raw = self
            .llm
            .complete(SYSTEM_PROMPT, &user_message)
            .await
            .map_err(|e| RcaError::Synthesis(format!("LLM call failed: {e}")))?;
        match parse_llm_json::<SynthesisReply>(&raw) {
            Ok(reply) => Ok(SynthesisResult {
                summary: reply.summary,
                key_finding: reply.key_finding,
                confidence_in_ranking: reply.confidence_in_ranking.clamp(0.0, 1.0),
            }),
            Err(err) => {
                error!("Synthesis reply could not be parsed: {err}");
                let top = &ranked[0];
                Ok(SynthesisResult {
                    summary: "The ranking indicates a likely causal chain, but the synthesis \
                              response could not be parsed. Review the top-ranked hypothesis \
                              details directly."
                        .to_string(),
                    key_finding: format!("{}: {}", top.label, top.description),
                    confidence_in_ranking: top.confidence,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Severity;

    struct CannedLlm(&'static str);

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn top_hypothesis() -> Hypothesis {
        Hypothesis {
            label: "DB pool exhaustion".to_string(),
            description: "Connection pool saturated after deploy".to_string(),
            confidence: 0.8,
            severity: Severity::High,
            supporting_signals: vec!["sig_001".to_string()],
            contributing_agents: vec!["metrics_agent".to_string()],
        }
    }

    #[tokio::test]
    async fn empty_ranking_skips_the_llm() {
        // A panicking client proves complete() is never reached.
        struct Unreachable;
        #[async_trait]
        impl LlmClient for Unreachable {
            async fn complete(&self, _s: &str, _u: &str) -> Result<String> {
                panic!("should not be called");
            }
        }

        let agent = SynthesisAgent::new(Arc::new(Unreachable));
        let result = agent.summarize(&[], &[]).await.unwrap();
        assert_eq!(result.confidence_in_ranking, 0.0);
        assert!(result.key_finding.contains("Insufficient evidence"));
    }

    #[tokio::test]
    async fn parses_well_formed_reply_and_clamps_confidence() {
        let agent = SynthesisAgent::new(Arc::new(CannedLlm(
            r#"{"summary": "Pool saturation after deploy.", "key_finding": "DB pool exhaustion", "confidence_in_ranking": 1.4}"#,
        )));
        let result = agent.summarize(&[], &[top_hypothesis()]).await.unwrap();
        assert_eq!(result.key_finding, "DB pool exhaustion");
        assert_eq!(result.confidence_in_ranking, 1.0);
    }

    #[tokio::test]
    async fn llm_failure_surfaces_as_synthesis_error() {
        struct Refusing;
        #[async_trait]
        impl LlmClient for Refusing {
            async fn complete(&self, _s: &str, _u: &str) -> Result<String> {
                Err(RcaError::Llm("upstream 503".to_string()))
            }
        }

        let agent = SynthesisAgent::new(Arc::new(Refusing));
        let err = agent.summarize(&[], &[top_hypothesis()]).await.unwrap_err();
        assert!(matches!(err, RcaError::Synthesis(_)));
        assert!(err.to_string().contains("upstream 503"));
    }

    #[tokio::test]
    async fn unparseable_reply_falls_back_to_top_hypothesis() {
        let agent = SynthesisAgent::new(Arc::new(CannedLlm("I think it is the database.")));
        let result = agent.summarize(&[], &[top_hypothesis()]).await.unwrap();
        assert!(result.key_finding.starts_with("DB pool exhaustion"));
        assert_eq!(result.confidence_in_ranking, 0.8);
    }
}
