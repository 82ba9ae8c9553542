//! Shared text-generation service.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - The provider client (and its HTTP connection pool) is built once in
//!   [`LlmService::new`] and reused for every request.
//!
//! Callers depend on the [`TextGenerator`] trait rather than on
//! [`LlmService`] so request handlers can be exercised with a fake.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{LlmService, TextGenerator, config::default_config::config_from_env};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc: Arc<dyn TextGenerator> = Arc::new(LlmService::new(config_from_env()?)?);
//! let text = svc.generate("Question:\nWhat do you offer?", Some("Be brief.")).await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use async_trait::async_trait;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{
        gemini_service::GeminiService, mock_service::MockService, open_ai_service::OpenAiService,
    },
};

/// Anything that turns a prompt (plus optional system instruction) into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a single answer.
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError>;

    /// Resilient health snapshot; never fails.
    async fn health(&self) -> HealthStatus;
}

/// Provider client selected from [`LlmModelConfig::provider`].
#[derive(Debug)]
pub enum Backend {
    Gemini(GeminiService),
    OpenAI(OpenAiService),
    Mock(MockService),
}

/// The production [`TextGenerator`]: one config, one provider client.
#[derive(Debug)]
pub struct LlmService {
    cfg: LlmModelConfig,
    backend: Backend,
    health: HealthService,
}

impl LlmService {
    /// Builds the provider client for `cfg`.
    ///
    /// # Errors
    /// Propagates provider constructor validation and HTTP client build errors.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let backend = match cfg.provider {
            LlmProvider::Gemini => Backend::Gemini(GeminiService::new(cfg.clone())?),
            LlmProvider::OpenAI => Backend::OpenAI(OpenAiService::new(cfg.clone())?),
            LlmProvider::Mock => Backend::Mock(MockService::new(cfg.clone())),
        };

        Ok(Self {
            health: HealthService::new(cfg.timeout_secs.map(|t| t.min(10))),
            cfg,
            backend,
        })
    }

    /// The active model config.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }
}

#[async_trait]
impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match &self.backend {
            Backend::Gemini(cli) => cli.generate(prompt, system).await,
            Backend::OpenAI(cli) => cli.generate(prompt, system).await,
            Backend::Mock(cli) => Ok(cli.generate(prompt, system)),
        }
    }

    async fn health(&self) -> HealthStatus {
        self.health.check(&self.cfg, &self.backend).await
    }
}
