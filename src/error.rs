use thiserror::Error;

#[derive(Error, Debug)]
pub enum RcaError {
    #[error("Invalid incident input: {0}")]
    InvalidInput(String),

    #[error("Agent '{0}' is already registered. Each agent must have a unique name.")]
    DuplicateAgent(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RcaError>;
