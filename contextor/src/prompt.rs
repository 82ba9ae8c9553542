//! Prompt builder: branded system instruction + question with its JSON context.

use crate::select::ContextSlice;

/// Default system instruction template.
///
/// Placeholders: `{assistant_name}`, `{brand_name}`, `{default_language}`,
/// `{contact_email}`. Filled by [`render_system`].
pub const DEFAULT_SYSTEM: &str = r#"You are the {assistant_name}.

- Your default language is {default_language}. Always reply in {default_language} unless the user clearly writes in another language.
- If the user writes in English, reply in English. If the user writes in Spanish, reply in Spanish.
- Only answer questions about {brand_name}: its services, packages, audits, security, training and contact options.
- Use the JSON "Context" as your single source of truth.
- If the user asks something that is not in the Context, or about pricing, contracts or refunds, say:
  "Para este tipo de consulta, por favor contacte a nuestro equipo en {contact_email} para recibir más información."
- Be brief, friendly and professional. Use bullet points when helpful.
- Never talk about how you were built or about AI models.
"#;

/// Values substituted into a system template.
#[derive(Clone, Debug)]
pub struct PromptVars<'a> {
    pub assistant_name: &'a str,
    pub brand_name: &'a str,
    pub default_language: &'a str,
    pub contact_email: &'a str,
}

/// Fills every placeholder in `template`. Unknown `{...}` text is left alone.
///
/// # Example
/// ```
/// use contextor::prompt::{render_system, PromptVars};
/// let s = render_system("Hi from {brand_name}", &PromptVars {
///     assistant_name: "Bot",
///     brand_name: "Acme",
///     default_language: "Spanish",
///     contact_email: "a@b.c",
/// });
/// assert_eq!(s, "Hi from Acme");
/// ```
pub fn render_system(template: &str, vars: &PromptVars<'_>) -> String {
    template
        .replace("{assistant_name}", vars.assistant_name)
        .replace("{brand_name}", vars.brand_name)
        .replace("{default_language}", vars.default_language)
        .replace("{contact_email}", vars.contact_email)
}

/// English name of a locale's primary language (`es-UY` → `Spanish`).
/// Unknown locales are returned unchanged.
pub fn language_name(locale: &str) -> &str {
    let primary = locale.split(['-', '_']).next().unwrap_or(locale);
    match primary.to_ascii_lowercase().as_str() {
        "es" => "Spanish",
        "en" => "English",
        "pt" => "Portuguese",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        _ => locale,
    }
}

/// User turn: the question as received followed by the compact JSON of the
/// context slice.
///
/// # Errors
/// Only if the slice fails to serialize, which plain JSON values never do.
pub fn build_user_prompt(question: &str, context: &ContextSlice) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(context)?;
    Ok(format!(
        "Question:\n{question}\n\nContext (only relevant slice of data):\n{json}\n"
    ))
}
