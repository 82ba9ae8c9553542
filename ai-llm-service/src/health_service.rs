//! Health checks for the configured text-generation backend.
//!
//! - Gemini: `GET {endpoint}/v1beta/models/{model}` (model must resolve)
//! - OpenAI: `GET {endpoint}/v1/models` (best-effort model existence check)
//! - Mock: always healthy, no I/O
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health` endpoint.
//! [`HealthService::check`] is resilient and never fails (errors mapped to `ok=false`).

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    llm_service::Backend,
};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "Gemini", "OpenAI").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured probe latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    pub fn ok(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self::build(cfg, true, latency_ms, message)
    }

    pub fn fail(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self::build(cfg, false, latency_ms, message)
    }

    fn build(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Runs provider probes with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HealthService {
    default_timeout: Duration,
}

impl HealthService {
    /// `timeout_secs` defaults to 10 seconds.
    pub fn new(timeout_secs: Option<u64>) -> Self {
        let default_timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        Self { default_timeout }
    }

    /// Probes `backend` (built from `cfg`). Never returns an error.
    pub async fn check(&self, cfg: &LlmModelConfig, backend: &Backend) -> HealthStatus {
        if cfg.provider != LlmProvider::Mock && !cfg.has_http_endpoint() {
            warn!(
                provider = ?cfg.provider,
                endpoint = %cfg.endpoint,
                "invalid endpoint (empty or missing http/https)"
            );
            return HealthStatus::fail(cfg, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        let status = match backend {
            Backend::Mock(_) => HealthStatus::ok(cfg, 0, "mock generator is always available"),
            Backend::Gemini(svc) => match svc.probe(self.default_timeout).await {
                Ok(()) => HealthStatus::ok(
                    cfg,
                    start.elapsed().as_millis(),
                    "Gemini is healthy; model is available",
                ),
                Err(e) => HealthStatus::fail(cfg, start.elapsed().as_millis(), e.to_string()),
            },
            Backend::OpenAI(svc) => match svc.probe(self.default_timeout).await {
                Ok(true) => HealthStatus::ok(
                    cfg,
                    start.elapsed().as_millis(),
                    "OpenAI is healthy; model is available",
                ),
                Ok(false) => HealthStatus::fail(
                    cfg,
                    start.elapsed().as_millis(),
                    "OpenAI is up, but model not found in /v1/models",
                ),
                Err(e) => HealthStatus::fail(cfg, start.elapsed().as_millis(), e.to_string()),
            },
        };

        if status.ok {
            info!(
                provider = %status.provider,
                model = %status.model.as_deref().unwrap_or("n/a"),
                latency_ms = status.latency_ms,
                "health probe completed"
            );
        } else {
            warn!(
                provider = %status.provider,
                model = %status.model.as_deref().unwrap_or("n/a"),
                latency_ms = status.latency_ms,
                message = %status.message,
                "health probe failed"
            );
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock_service::MockService;

    fn mock_cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Mock,
            model: "mock".into(),
            endpoint: String::new(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        }
    }

    #[tokio::test]
    async fn mock_backend_is_healthy_without_endpoint() {
        let cfg = mock_cfg();
        let backend = Backend::Mock(MockService::new(cfg.clone()));
        let status = HealthService::new(None).check(&cfg, &backend).await;

        assert!(status.ok);
        assert_eq!(status.provider, "Mock");
        assert_eq!(status.model.as_deref(), Some("mock"));
    }

    #[tokio::test]
    async fn remote_backend_without_endpoint_fails_fast() {
        let mut cfg = mock_cfg();
        cfg.provider = LlmProvider::Gemini;
        let backend = Backend::Mock(MockService::new(cfg.clone()));
        let status = HealthService::new(Some(1)).check(&cfg, &backend).await;

        assert!(!status.ok);
        assert_eq!(status.latency_ms, 0);
    }
}
