//! Offline generator: returns a deterministic reply built from the prompt.
//!
//! Selected with `LLM_KIND=mock`; lets the whole request path run without an
//! API key or network access.

use tracing::debug;

use crate::config::llm_model_config::LlmModelConfig;

/// Prefix of every mock answer, handy for asserting in tests.
pub const MOCK_PREFIX: &str = "[mock]";

const PREVIEW_CHARS: usize = 80;

#[derive(Debug)]
pub struct MockService {
    cfg: LlmModelConfig,
}

impl MockService {
    pub fn new(cfg: LlmModelConfig) -> Self {
        Self { cfg }
    }

    /// Echoes the first question line (or the prompt start) back.
    pub fn generate(&self, prompt: &str, system: Option<&str>) -> String {
        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            has_system = system.is_some(),
            "mock generation"
        );

        let question = prompt
            .split("Question:")
            .nth(1)
            .and_then(|rest| rest.lines().map(str::trim).find(|l| !l.is_empty()))
            .unwrap_or_else(|| prompt.trim());

        let mut preview: String = question.chars().take(PREVIEW_CHARS).collect();
        if question.chars().count() > PREVIEW_CHARS {
            preview.push('…');
        }
        format!("{MOCK_PREFIX} You asked: {preview}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::llm_provider::LlmProvider;

    fn svc() -> MockService {
        MockService::new(LlmModelConfig {
            provider: LlmProvider::Mock,
            model: "mock".into(),
            endpoint: String::new(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        })
    }

    #[test]
    fn echoes_question_line() {
        let out = svc().generate("\nQuestion:\n¿Qué es una auditoría?\n\nContext:\n{}", None);
        assert_eq!(out, "[mock] You asked: ¿Qué es una auditoría?");
    }

    #[test]
    fn falls_back_to_prompt_and_truncates() {
        let long = "word ".repeat(40);
        let out = svc().generate(&long, Some("sys"));
        assert!(out.starts_with(MOCK_PREFIX));
        assert!(out.ends_with('…'));
    }
}
