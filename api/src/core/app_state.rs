use std::{path::PathBuf, sync::Arc};

use ai_llm_service::TextGenerator;
use axum::http::{HeaderValue, Method, header};
use contextor::{ContextorConfig, DEFAULT_LOCALE};
use knowledge_base::KnowledgeBase;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_KNOWLEDGE_BASE_PATH: &str = "data/packages.json";
pub const DEFAULT_MAX_QUESTION_CHARS: usize = 2000;

/// Invalid HTTP-layer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("DEFAULT_LOCALE `{default}` is not one of LOCALES {locales:?}")]
    UnknownDefaultLocale {
        default: String,
        locales: Vec<String>,
    },
}

/// HTTP-layer settings read at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub address: String,
    pub knowledge_base_path: PathBuf,
    /// Accepted locale prefixes; never empty.
    pub locales: Vec<String>,
    /// Locale used when the path has no prefix; always in `locales`.
    pub default_locale: String,
    pub max_question_chars: usize,
    /// Empty means no CORS layer.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Reads `API_ADDRESS`, `KNOWLEDGE_BASE_PATH`, `LOCALES`, `DEFAULT_LOCALE`,
    /// `MAX_QUESTION_CHARS` and `CORS_ALLOWED_ORIGINS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut locales = var("LOCALES").map(|v| split_list(&v)).unwrap_or_default();
        if locales.is_empty() {
            locales.push(DEFAULT_LOCALE.to_string());
        }

        let default_locale = match var("DEFAULT_LOCALE") {
            Some(l) => l,
            None if locales.iter().any(|l| l == DEFAULT_LOCALE) => DEFAULT_LOCALE.to_string(),
            None => locales[0].clone(),
        };
        if !locales.contains(&default_locale) {
            return Err(ConfigError::UnknownDefaultLocale {
                default: default_locale,
                locales,
            });
        }

        let max_question_chars = match var("MAX_QUESTION_CHARS") {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "MAX_QUESTION_CHARS",
                        reason: "must be greater than zero".into(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "MAX_QUESTION_CHARS",
                        reason: e.to_string(),
                    });
                }
            },
            None => DEFAULT_MAX_QUESTION_CHARS,
        };

        Ok(Self {
            address: var("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            knowledge_base_path: var("KNOWLEDGE_BASE_PATH")
                .unwrap_or_else(|| DEFAULT_KNOWLEDGE_BASE_PATH.into())
                .into(),
            locales,
            default_locale,
            max_question_chars,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
        })
    }

    /// CORS layer for the configured origins; `None` when unset.
    /// `*` allows any origin.
    pub fn cors_layer(&self) -> Result<Option<CorsLayer>, ConfigError> {
        if self.cors_allowed_origins.is_empty() {
            return Ok(None);
        }

        let origin = if self.cors_allowed_origins.iter().any(|o| o == "*") {
            AllowOrigin::from(Any)
        } else {
            let values = self
                .cors_allowed_origins
                .iter()
                .map(|o| {
                    HeaderValue::from_str(o).map_err(|e| ConfigError::Invalid {
                        var: "CORS_ALLOWED_ORIGINS",
                        reason: format!("`{o}`: {e}"),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            AllowOrigin::list(values)
        };

        Ok(Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        ))
    }
}

fn split_list(v: &str) -> Vec<String> {
    v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub kb: Arc<KnowledgeBase>,
    pub generator: Arc<dyn TextGenerator>,
    pub contextor: ContextorConfig,
    pub locales: Vec<String>,
    pub default_locale: String,
    pub max_question_chars: usize,
}

impl AppState {
    pub fn new(
        cfg: &AppConfig,
        kb: Arc<KnowledgeBase>,
        generator: Arc<dyn TextGenerator>,
        contextor: ContextorConfig,
    ) -> Self {
        Self {
            kb,
            generator,
            contextor,
            locales: cfg.locales.clone(),
            default_locale: cfg.default_locale.clone(),
            max_question_chars: cfg.max_question_chars,
        }
    }

    /// The locale a request runs under: the path prefix when it is configured,
    /// the default when there is none, `None` for an unknown prefix.
    pub fn resolve_locale<'a>(&'a self, prefix: Option<&'a str>) -> Option<&'a str> {
        match prefix {
            None => Some(self.default_locale.as_str()),
            Some(p) => self.locales.iter().find(|l| *l == p).map(String::as_str),
        }
    }
}
