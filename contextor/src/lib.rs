//! Support-assistant gateway with a single entry point.
//!
//! Public API: [`ask`]. It selects the relevant slice of the knowledge base
//! for the question ([`select`]), builds a branded system instruction and a
//! user prompt carrying that slice as JSON ([`prompt`]), calls the text
//! generator once and returns the answer together with the context it saw.

mod api_types;
mod cfg;
mod error;
pub mod prompt;
mod select;

use std::time::Instant;

use ai_llm_service::TextGenerator;
use knowledge_base::KnowledgeBase;
use tracing::{info, warn};

pub use api_types::{AskOptions, QaAnswer};
pub use cfg::{ContextorConfig, DEFAULT_ASSISTANT_NAME, DEFAULT_BRAND_NAME, DEFAULT_SUPPORT_EMAIL};
pub use error::ContextorError;
pub use select::{
    ContextSlice, FAQ_FALLBACK_COUNT, FAQ_MATCH_LIMIT, PackageFallback, SelectorPolicy, select,
    select_with,
};

/// Answer used when the provider replies without any text.
pub const NO_RESPONSE_TEXT: &str = "No response text found.";

/// Locale assumed when [`AskOptions::locale`] is unset.
pub const DEFAULT_LOCALE: &str = "es";

/// Answers one question grounded on the knowledge base.
///
/// Exactly one generation call is made per invocation.
///
/// # Errors
/// [`ContextorError::Llm`] for any provider failure other than an empty
/// reply, which yields [`NO_RESPONSE_TEXT`] instead.
///
/// # Example
/// ```no_run
/// # use contextor::{ask, AskOptions, ContextorConfig};
/// # use ai_llm_service::{LlmService, config::default_config::config_from_env};
/// # use knowledge_base::KnowledgeBase;
/// # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let llm = LlmService::new(config_from_env()?)?;
/// let kb = KnowledgeBase::from_path("data/packages.json")?;
/// let qa = ask(&llm, &kb, "¿Qué incluye la auditoría?", &ContextorConfig::from_env()?, AskOptions::default()).await?;
/// println!("{}", qa.answer);
/// # Ok(()) }
/// ```
pub async fn ask(
    generator: &dyn TextGenerator,
    kb: &KnowledgeBase,
    question: &str,
    cfg: &ContextorConfig,
    opts: AskOptions,
) -> Result<QaAnswer, ContextorError> {
    let started = Instant::now();

    let context = select_with(question, kb, &cfg.selector);
    let locale = opts.locale.as_deref().unwrap_or(DEFAULT_LOCALE);
    let system = cfg.system_prompt(locale);
    let user_prompt = prompt::build_user_prompt(question, &context)?;

    let answer = match generator.generate(&user_prompt, Some(&system)).await {
        Ok(text) => text,
        Err(e) if e.is_empty_response() => {
            warn!(error = %e, "provider returned no text");
            NO_RESPONSE_TEXT.to_string()
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        locale,
        packages = context.packages.len(),
        faq = context.faq.len(),
        prompt_bytes = user_prompt.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "question answered"
    );

    Ok(QaAnswer { answer, context })
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use ai_llm_service::{
        AiLlmError, HealthStatus,
        error_handler::{Provider, ProviderError, ProviderErrorKind},
    };
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    /// Records every call and replies with a fixed outcome.
    struct FakeGenerator {
        reply: fn() -> Result<String, AiLlmError>,
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl FakeGenerator {
        fn new(reply: fn() -> Result<String, AiLlmError>) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), system.map(str::to_string)));
            (self.reply)()
        }

        async fn health(&self) -> HealthStatus {
            unreachable!("not used by ask")
        }
    }

    fn kb() -> KnowledgeBase {
        serde_json::from_value(json!({
            "brand": { "name": "CelesteIQ" },
            "contact": { "email": "support@celesteiq.com" },
            "packages": [
                { "id": "sec1", "name": "Security Audit", "deliverables": ["report"] },
                { "id": "train1", "name": "Training" }
            ],
            "faq": [ { "q": "How long is the audit?", "a": "Two weeks." } ],
            "routing": [ { "triggers": ["security audit"], "targetPackageId": "sec1" } ]
        }))
        .unwrap()
    }

    fn provider_err(kind: ProviderErrorKind) -> AiLlmError {
        AiLlmError::Provider(ProviderError::new(Provider::Gemini, kind))
    }

    #[tokio::test]
    async fn one_call_with_system_and_context() {
        let fake = FakeGenerator::new(|| Ok("Hola!".to_string()));
        let qa = ask(
            &fake,
            &kb(),
            "I need a security audit",
            &ContextorConfig::default(),
            AskOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(qa.answer, "Hola!");
        assert_eq!(qa.context.packages.len(), 1);
        assert_eq!(qa.context.packages[0].id, "sec1");

        let calls = fake.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (prompt, system) = &calls[0];
        assert!(prompt.starts_with("Question:\nI need a security audit\n"));
        assert!(prompt.contains("\"deliverables\""));
        assert!(!prompt.contains("\"train1\""));
        let system = system.as_deref().unwrap();
        assert!(system.contains("CelesteIQ Assistant"));
        assert!(system.contains("Always reply in Spanish"));
    }

    #[tokio::test]
    async fn locale_changes_default_language() {
        let fake = FakeGenerator::new(|| Ok("ok".to_string()));
        ask(
            &fake,
            &kb(),
            "hello",
            &ContextorConfig::default(),
            AskOptions {
                locale: Some("en".into()),
            },
        )
        .await
        .unwrap();

        let calls = fake.calls.lock().unwrap();
        assert!(calls[0].1.as_deref().unwrap().contains("Always reply in English"));
    }

    #[tokio::test]
    async fn empty_provider_text_becomes_placeholder_answer() {
        let fake = FakeGenerator::new(|| Err(provider_err(ProviderErrorKind::EmptyResponse)));
        let qa = ask(
            &fake,
            &kb(),
            "hola",
            &ContextorConfig::default(),
            AskOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(qa.answer, NO_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let fake = FakeGenerator::new(|| Err(AiLlmError::Timeout(Duration::from_secs(30))));
        let err = ask(
            &fake,
            &kb(),
            "hola",
            &ContextorConfig::default(),
            AskOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ContextorError::Llm(AiLlmError::Timeout(_))));
    }
}
