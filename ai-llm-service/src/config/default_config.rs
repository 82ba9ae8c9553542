//! Default LLM configs loaded from environment variables.
//!
//! [`config_from_env`] picks the provider from `LLM_KIND` (default `gemini`)
//! and builds a validated [`LlmModelConfig`] for it. Every reader has a
//! `*_from` twin that takes a lookup closure, so callers (and tests) can
//! supply values without touching the process environment.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`          = `gemini` | `openai` | `mock`
//! - `LLM_MAX_TOKENS`    = max generated tokens (u32, default 300)
//! - `LLM_TEMPERATURE`   = sampling temperature (default 0.3, 0.0..=2.0)
//! - `LLM_TOP_P`         = optional nucleus sampling (0.0..=1.0)
//! - `LLM_TIMEOUT_SECS`  = request timeout (default 30)
//!
//! Gemini:
//! - `GOOGLE_API_KEY`    (required)
//! - `GEMINI_MODEL`      (default `gemini-2.0-flash`)
//! - `GEMINI_URL`        (default `https://generativelanguage.googleapis.com`)
//!
//! OpenAI:
//! - `OPENAI_API_KEY`    (required)
//! - `OPENAI_MODEL`      (default `gpt-4o-mini`)
//! - `OPENAI_URL`        (default `https://api.openai.com`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, must_var, non_empty, validate_http_endpoint, validate_range_f32,
        var_opt_f32, var_opt_u32, var_opt_u64,
    },
};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Builds the config for the provider named by `LLM_KIND`.
///
/// # Errors
/// Any [`ConfigError`] from the provider-specific reader, or
/// [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`.
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_from(&process_env)
}

/// Same as [`config_from_env`], reading values through `lookup`.
pub fn config_from<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match non_empty(lookup, "LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::default(),
    };

    match provider {
        LlmProvider::Gemini => config_gemini_from(lookup),
        LlmProvider::OpenAI => config_openai_from(lookup),
        LlmProvider::Mock => config_mock_from(lookup),
    }
}

/// Gemini `generateContent` config.
///
/// # Defaults
/// - `max_tokens = 300`, `temperature = 0.3`, `timeout_secs = 30`
pub fn config_gemini_from<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(lookup, "GOOGLE_API_KEY")?;
    let model = non_empty(lookup, "GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into());
    let endpoint = non_empty(lookup, "GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.into());
    validate_http_endpoint("GEMINI_URL", &endpoint)?;

    with_sampling(
        lookup,
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model,
            endpoint,
            api_key: Some(api_key),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        },
    )
}

/// OpenAI chat completions config.
pub fn config_openai_from<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(lookup, "OPENAI_API_KEY")?;
    let model = non_empty(lookup, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());
    let endpoint = non_empty(lookup, "OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.into());
    validate_http_endpoint("OPENAI_URL", &endpoint)?;

    with_sampling(
        lookup,
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model,
            endpoint,
            api_key: Some(api_key),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        },
    )
}

/// Offline mock config; needs no key and no network.
pub fn config_mock_from<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    with_sampling(
        lookup,
        LlmModelConfig {
            provider: LlmProvider::Mock,
            model: "mock".into(),
            endpoint: String::new(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        },
    )
}

/// Applies and validates the shared sampling knobs.
fn with_sampling<F>(lookup: &F, mut cfg: LlmModelConfig) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    if cfg.model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let temperature = var_opt_f32(lookup, "LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", "expected 0.0..=2.0", temperature, 0.0, 2.0)?;

    let top_p = var_opt_f32(lookup, "LLM_TOP_P")?;
    if let Some(p) = top_p {
        validate_range_f32("top_p", "expected 0.0..=1.0", p, 0.0, 1.0)?;
    }

    let max_tokens = var_opt_u32(lookup, "LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
    if max_tokens == 0 {
        return Err(ConfigError::OutOfRange {
            field: "max_tokens",
            detail: "expected a positive number",
        }
        .into());
    }

    cfg.max_tokens = Some(max_tokens);
    cfg.temperature = Some(temperature);
    cfg.top_p = top_p;
    cfg.timeout_secs = Some(var_opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS));
    Ok(cfg)
}
