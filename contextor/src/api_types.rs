//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;

use crate::select::ContextSlice;

/// Per-question options.
///
/// # Example
/// ```
/// use contextor::AskOptions;
/// let opts = AskOptions { locale: Some("es".into()) };
/// assert_eq!(opts.locale.as_deref(), Some("es"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AskOptions {
    /// Conversation locale; picks the default reply language.
    /// `None` falls back to [`crate::DEFAULT_LOCALE`].
    pub locale: Option<String>,
}

/// Final answer together with the exact context passed to the model.
#[derive(Clone, Debug, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    pub context: ContextSlice,
}
