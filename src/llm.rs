//! LLM client abstraction and OpenRouter implementation.
//!
//! Agents depend only on the `LlmClient` trait — never on a concrete
//! provider. Swapping providers per agent is a construction-time decision
//! with zero changes to the pipeline. The core runtime (executor, judge,
//! aggregator) never calls an LLM at all.

use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{RcaError, Result};

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// The single capability agents need from a reasoning service.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a system + user prompt and return the reply as plain text.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// `LlmClient` backed by OpenRouter's OpenAI-compatible chat API.
///
/// Model routing is just a string — pass the model ID at construction time
/// (e.g. "anthropic/claude-sonnet-4", "google/gemini-2.0-flash") and the
/// client handles the rest with one API key.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    /// Build a client for a specific model, reading `OPENROUTER_API_KEY`
    /// from the environment (a `.env` file is honoured). Fails immediately
    /// at construction rather than at the first API call.
    pub fn new(model: impl Into<String>) -> Result<Self> {
        dotenv::dotenv().ok();
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| RcaError::Llm("OPENROUTER_API_KEY is not set".to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENROUTER_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| RcaError::Llm(format!("LLM API call failed: {e}")))?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RcaError::Llm(format!("Failed to parse LLM response: {e}")))?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RcaError::Llm("No content in LLM response".to_string()))
    }
}

/// Parse an LLM reply into a typed value, tolerating the usual noise.
///
/// Tries, in order:
/// 1. Strip markdown code fences and parse the remainder.
/// 2. Extract the outermost `{...}` block (handles leading commentary).
/// 3. Fail with an `Llm` error that includes a snippet of the raw reply.
pub fn parse_llm_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let stripped = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str(&stripped) {
        return Ok(value);
    }

    let block_re = Regex::new(r"(?s)\{.*\}").expect("static regex");
    if let Some(block) = block_re.find(&stripped) {
        if let Ok(value) = serde_json::from_str(block.as_str()) {
            return Ok(value);
        }
    }

    let snippet: String = raw.chars().take(200).collect();
    Err(RcaError::Llm(format!(
        "Response is not valid JSON for the expected schema. Raw: {snippet}"
    )))
}

fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    // Drop an optional language tag after the opening fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim().to_string()
}
