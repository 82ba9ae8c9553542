//! Runtime configuration loaded from environment variables.

use std::fs;

use tracing::info;

use crate::{
    error::ContextorError,
    prompt::{self, PromptVars},
    select::{PackageFallback, SelectorPolicy},
};

pub const DEFAULT_ASSISTANT_NAME: &str = "CelesteIQ Assistant";
pub const DEFAULT_BRAND_NAME: &str = "CelesteIQ";
pub const DEFAULT_SUPPORT_EMAIL: &str = "support@celesteiq.com";

/// Branding, prompt template and selector policy. All fields have defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextorConfig {
    pub assistant_name: String,
    pub brand_name: String,
    pub contact_email: String,
    /// System template with `{...}` placeholders, see [`prompt::DEFAULT_SYSTEM`].
    pub system_template: String,
    pub selector: SelectorPolicy,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            brand_name: DEFAULT_BRAND_NAME.to_string(),
            contact_email: DEFAULT_SUPPORT_EMAIL.to_string(),
            system_template: prompt::DEFAULT_SYSTEM.to_string(),
            selector: SelectorPolicy::default(),
        }
    }
}

impl ContextorConfig {
    /// Build from process environment variables.
    pub fn from_env() -> Result<Self, ContextorError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Reads `ASSISTANT_NAME`, `BRAND_NAME`, `SUPPORT_EMAIL` (then
    /// `NEXT_PUBLIC_SUPPORT_EMAIL`), `SYSTEM_PROMPT_PATH` and `PACKAGE_FALLBACK`.
    ///
    /// # Errors
    /// Unreadable prompt file or an unknown `PACKAGE_FALLBACK` value.
    ///
    /// # Example
    /// ```
    /// use contextor::ContextorConfig;
    /// let cfg = ContextorConfig::from_lookup(|k| (k == "BRAND_NAME").then(|| "Acme".to_string())).unwrap();
    /// assert_eq!(cfg.brand_name, "Acme");
    /// assert_eq!(cfg.contact_email, "support@celesteiq.com");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ContextorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let dflt = Self::default();

        let system_template = match var("SYSTEM_PROMPT_PATH") {
            Some(path) => {
                let text = fs::read_to_string(&path).map_err(|source| ContextorError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %path, "custom system prompt loaded");
                text
            }
            None => dflt.system_template,
        };

        let package_fallback = match var("PACKAGE_FALLBACK") {
            Some(v) => v.parse::<PackageFallback>()?,
            None => PackageFallback::default(),
        };

        Ok(Self {
            assistant_name: var("ASSISTANT_NAME").unwrap_or(dflt.assistant_name),
            brand_name: var("BRAND_NAME").unwrap_or(dflt.brand_name),
            contact_email: var("SUPPORT_EMAIL")
                .or_else(|| var("NEXT_PUBLIC_SUPPORT_EMAIL"))
                .unwrap_or(dflt.contact_email),
            system_template,
            selector: SelectorPolicy { package_fallback },
        })
    }

    /// System instruction for a conversation whose default locale is `locale`.
    pub fn system_prompt(&self, locale: &str) -> String {
        prompt::render_system(
            &self.system_template,
            &PromptVars {
                assistant_name: &self.assistant_name,
                brand_name: &self.brand_name,
                default_language: prompt::language_name(locale),
                contact_email: &self.contact_email,
            },
        )
    }
}
