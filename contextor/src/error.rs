//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Errors from the text-generation backend.
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// The context slice could not be serialized into the prompt.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A custom system prompt file could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),
}
