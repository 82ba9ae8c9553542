//! Provider selection and per-model configuration.

pub mod default_config;
pub mod llm_model_config;
pub mod llm_provider;
