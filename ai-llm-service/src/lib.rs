//! Text-generation collaborator for the support assistant.
//!
//! Wraps hosted LLM APIs (Gemini by default, OpenAI, or an offline mock)
//! behind the [`TextGenerator`] trait, with env-driven configuration,
//! resilient health checks and a library-scoped tracing layer.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use error_handler::{AiLlmError, ConfigError};
pub use health_service::HealthStatus;
pub use llm_service::{LlmService, TextGenerator};
