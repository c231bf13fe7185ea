//! System prompt for block translation.
//!
//! Callers can override the prompt via
//! [`crate::config::TranslationConfig::system_prompt`]; the template here is
//! used only when no override is provided.

/// Default translation prompt. `{source}` and `{target}` are replaced with
/// the configured language names.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a professional translator. Translate the text the user sends from {source} to {target}.

Rules:
- Output ONLY the translation. No commentary, no notes, no quotation marks around it.
- Preserve numbers, dates, units, proper names and line breaks.
- Text extracted from a PDF may contain hyphenated line breaks; join them.
- If the text is already in {target} or cannot be translated (codes, identifiers), return it unchanged."#;

/// Render the system prompt for a language pair.
///
/// A custom prompt may use the same `{source}`/`{target}` placeholders.
pub fn translation_prompt(template: Option<&str>, source: &str, target: &str) -> String {
    template
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
        .replace("{source}", source)
        .replace("{target}", target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_names_both_languages() {
        let p = translation_prompt(None, "Swedish", "English");
        assert!(p.contains("from Swedish to English"));
        assert!(!p.contains("{source}"));
        assert!(!p.contains("{target}"));
    }

    #[test]
    fn custom_prompt_placeholders_are_filled() {
        let p = translation_prompt(Some("{source} → {target}, terse."), "German", "French");
        assert_eq!(p, "German → French, terse.");
    }
}
