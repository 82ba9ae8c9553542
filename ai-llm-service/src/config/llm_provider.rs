use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for text generation.
///
/// Parsed from `LLM_KIND` (case-insensitive):
///
/// ```
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// assert_eq!("Gemini".parse::<LlmProvider>().unwrap(), LlmProvider::Gemini);
/// assert_eq!("chatgpt".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
/// assert!("bard".parse::<LlmProvider>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LlmProvider {
    /// Google Gemini `generateContent` API.
    #[default]
    Gemini,
    /// OpenAI chat completions API.
    OpenAI,
    /// Offline deterministic generator (local development, tests).
    Mock,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            "mock" => Ok(LlmProvider::Mock),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
