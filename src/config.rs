//! Runtime configuration.
//!
//! Tunable parameters for one `RcaRuntime` instance, with documented
//! defaults. Values can also be picked up from the environment so deploys
//! can adjust thresholds without a rebuild.

use std::time::Duration;

use tracing::warn;

/// Tunables for the pipeline. Construct with `RuntimeConfig::default()` and
/// adjust fields, or load overrides with `from_env()`.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Per-agent deadline. Agents exceeding it are cancelled and recorded
    /// as timed out. Default: 30s.
    pub agent_timeout: Duration,

    /// Maximum number of ranked hypotheses in the result. Default: 5.
    pub max_ranked: usize,

    /// If the top-ranked score falls below this, the result is flagged for
    /// human review. A tunable, not a law — 0.5 is the documented default.
    pub review_threshold: f64,

    /// Score bonus per additional distinct agent agreeing on a hypothesis.
    /// Default: 0.1, with the final score clamped to 1.0.
    pub agreement_bonus: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            agent_timeout: Duration::from_secs(30),
            max_ranked: 5,
            review_threshold: 0.5,
            agreement_bonus: 0.1,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `RCA_AGENT_TIMEOUT_SECS`, `RCA_MAX_RANKED`,
    /// `RCA_REVIEW_THRESHOLD`, and `RCA_AGREEMENT_BONUS` where set.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = read_env::<u64>("RCA_AGENT_TIMEOUT_SECS") {
            config.agent_timeout = Duration::from_secs(secs);
        }
        if let Some(cap) = read_env::<usize>("RCA_MAX_RANKED") {
            config.max_ranked = cap;
        }
        if let Some(threshold) = read_env::<f64>("RCA_REVIEW_THRESHOLD") {
            config.review_threshold = threshold;
        }
        if let Some(bonus) = read_env::<f64>("RCA_AGREEMENT_BONUS") {
            config.agreement_bonus = bonus;
        }

        config
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {key}={raw}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.agent_timeout, Duration::from_secs(30));
        assert_eq!(config.max_ranked, 5);
        assert_eq!(config.review_threshold, 0.5);
        assert_eq!(config.agreement_bonus, 0.1);
    }
}
