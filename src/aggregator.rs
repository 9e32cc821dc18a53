//! Hypothesis aggregator.
//!
//! Takes judged outcomes and produces a single ranked hypothesis list plus
//! the human-review decision. Two concerns the judge does not handle:
//!
//! 1. Deduplication — hypotheses with similar labels from different agents
//!    are merged into one, with all contributing agents listed.
//! 2. Scoring — final_score = best base confidence + agreement bonus
//!    (+0.1 per additional distinct contributing agent), clamped to 1.0.
//!
//! Ranking is fully deterministic: score descending, then number of
//! contributing agents descending, then label lexical order. Completion
//! order of the agents never influences the result.

use tracing::debug;

use crate::config::RuntimeConfig;
use crate::hypothesis::Hypothesis;
use crate::judge::JudgedResult;

/// Output fragment of the aggregation stage.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub ranked: Vec<Hypothesis>,
    pub requires_human_review: bool,
}

/// Ranks and deduplicates hypotheses from accepted outcomes.
///
/// Label matching is case-insensitive bidirectional substring comparison —
/// "DB Pool" matches "DB Connection Pool Exhaustion". A lightweight
/// clustering rule, not semantic matching.
#[derive(Debug, Clone)]
pub struct Aggregator {
    /// Maximum number of ranked hypotheses returned.
    max_ranked: usize,
    /// Top score below this flags the result for human review.
    review_threshold: f64,
    /// Score bonus per additional distinct contributing agent.
    agreement_bonus: f64,
}

impl Aggregator {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            max_ranked: config.max_ranked,
            review_threshold: config.review_threshold,
            agreement_bonus: config.agreement_bonus,
        }
    }

    /// Merge, score, and rank hypotheses from valid results only.
    ///
    /// The review flag is true whenever any result was rejected during the
    /// run, no hypothesis survived, or the top score falls below the
    /// threshold — false only for a sufficiently confident, clean result.
    pub fn aggregate(&self, judged: &[JudgedResult]) -> Aggregation {
        let any_rejected = judged.iter().any(|j| !j.valid);

        let collected: Vec<&Hypothesis> = judged
            .iter()
            .filter(|j| j.valid)
            .flat_map(|j| j.outcome.hypotheses.iter())
            .collect();

        let groups = group_by_label(&collected);
        let mut ranked: Vec<Hypothesis> = groups
            .iter()
            .map(|group| self.merge_group(group))
            .collect();

        ranked.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| b.contributing_agents.len().cmp(&a.contributing_agents.len()))
                .then_with(|| a.label.cmp(&b.label))
        });
        ranked.truncate(self.max_ranked);

        let requires_human_review = any_rejected
            || ranked.is_empty()
            || ranked[0].confidence < self.review_threshold;

        debug!(
            "Aggregated {} hypotheses into {} ranked (review: {})",
            collected.len(),
            ranked.len(),
            requires_human_review
        );

        Aggregation {
            ranked,
            requires_human_review,
        }
    }

    /// Merge a non-empty group of matching hypotheses into one.
    ///
    /// Keeps the member with the highest base confidence, adds the
    /// agreement bonus for each extra distinct agent, and unions the
    /// contributing agents and cited signals.
    fn merge_group(&self, group: &[&Hypothesis]) -> Hypothesis {
        let best = group
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .expect("group is never empty");

        let mut agents: Vec<String> = group
            .iter()
            .flat_map(|h| h.contributing_agents.iter().cloned())
            .collect();
        agents.sort_unstable();
        agents.dedup();

        let bonus = self.agreement_bonus * (agents.len().saturating_sub(1)) as f64;
        let score = (best.confidence + bonus).min(1.0);

        // Union of cited signal IDs, first-seen order preserved.
        let mut seen = std::collections::HashSet::new();
        let mut signals = Vec::new();
        for h in group {
            for id in &h.supporting_signals {
                if seen.insert(id.clone()) {
                    signals.push(id.clone());
                }
            }
        }

        Hypothesis {
            confidence: round4(score),
            supporting_signals: signals,
            contributing_agents: agents,
            ..(*best).clone()
        }
    }
}

/// Place each hypothesis into the first group whose representative label it
/// matches, or start a new group.
fn group_by_label<'a>(hypotheses: &[&'a Hypothesis]) -> Vec<Vec<&'a Hypothesis>> {
    let mut groups: Vec<Vec<&Hypothesis>> = Vec::new();
    for &hypothesis in hypotheses {
        match groups
            .iter_mut()
            .find(|group| labels_match(&hypothesis.label, &group[0].label))
        {
            Some(group) => group.push(hypothesis),
            None => groups.push(vec![hypothesis]),
        }
    }
    groups
}

/// Case-insensitive bidirectional substring match on trimmed labels.
fn labels_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    a.contains(&b) || b.contains(&a)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
