//! Translation service: the [`Translator`] seam and its LLM-backed implementation.
//!
//! The page loop only ever sees `&dyn Translator`: one synchronous call per
//! non-blank block, blocking until the translation is available. Any closure
//! `Fn(&str) -> Result<String, PdfTranslateError>` is a translator, which is
//! how tests and offline runs plug in.
//!
//! [`LlmTranslator`] drives an `edgequake_llm` provider. The provider API is
//! async, so the translator owns a current-thread tokio runtime and blocks on
//! each request; nothing else runs on it. Do not call it from inside another
//! tokio runtime.

use crate::config::TranslationConfig;
use crate::error::PdfTranslateError;
use crate::pipeline::postprocess::clean_translation;
use crate::prompts::translation_prompt;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::debug;

/// Default model when a provider is named without one.
const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Default model for a local Ollama server.
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Translates one block of text. The language pair is fixed by the implementor.
pub trait Translator {
    fn translate(&self, text: &str) -> Result<String, PdfTranslateError>;
}

impl<F> Translator for F
where
    F: Fn(&str) -> Result<String, PdfTranslateError>,
{
    fn translate(&self, text: &str) -> Result<String, PdfTranslateError> {
        self(text)
    }
}

/// A [`Translator`] backed by an LLM chat completion.
pub struct LlmTranslator {
    provider: Arc<dyn LLMProvider>,
    runtime: Runtime,
    system_prompt: String,
    options: CompletionOptions,
}

impl fmt::Debug for LlmTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmTranslator")
            .field("provider", &"<dyn LLMProvider>")
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

impl LlmTranslator {
    /// Resolve the provider from `config` and build the translator.
    ///
    /// This is the one-time model setup of a run; failure is fatal.
    pub fn from_config(config: &TranslationConfig) -> Result<Self, PdfTranslateError> {
        let provider = resolve_provider(config)?;
        Self::new(provider, config)
    }

    /// Build a translator around an existing provider.
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        config: &TranslationConfig,
    ) -> Result<Self, PdfTranslateError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PdfTranslateError::Internal(format!("Failed to create tokio runtime: {}", e)))?;

        Ok(Self {
            provider,
            runtime,
            system_prompt: translation_prompt(
                config.system_prompt.as_deref(),
                &config.source_lang,
                &config.target_lang,
            ),
            options: build_options(config),
        })
    }
}

impl Translator for LlmTranslator {
    fn translate(&self, text: &str) -> Result<String, PdfTranslateError> {
        let start = Instant::now();
        let messages = vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(text),
        ];

        let response = self
            .runtime
            .block_on(self.provider.chat(&messages, Some(&self.options)))
            .map_err(|e| PdfTranslateError::TranslationFailed {
                page: 0,
                detail: format!("{}", e),
            })?;

        debug!(
            "Translated {} chars: {} input tokens, {} output tokens, {:?}",
            text.chars().count(),
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        let translated = clean_translation(&response.content);
        if translated.is_empty() {
            return Err(PdfTranslateError::TranslationFailed {
                page: 0,
                detail: format!(
                    "model returned an empty translation for {:?}",
                    preview(text)
                ),
            });
        }
        Ok(translated)
    }
}

/// Build `CompletionOptions` from the translation config.
fn build_options(config: &TranslationConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

fn preview(text: &str) -> String {
    let mut p: String = text.chars().take(40).collect();
    if text.chars().count() > 40 {
        p.push('…');
    }
    p
}

fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, PdfTranslateError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PdfTranslateError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

fn default_model_for(provider_name: &str) -> &'static str {
    if provider_name.eq_ignore_ascii_case("ollama") {
        DEFAULT_OLLAMA_MODEL
    } else {
        DEFAULT_MODEL
    }
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider + model** (`config.provider_name`); the factory reads
///    the matching API key or endpoint from the environment.
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 4. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_provider(
    config: &TranslationConfig,
) -> Result<Arc<dyn LLMProvider>, PdfTranslateError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config
            .model
            .as_deref()
            .unwrap_or_else(|| default_model_for(name));
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, config.model.as_deref().unwrap_or(&model));
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| PdfTranslateError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Run a local model with --provider ollama, or set OPENAI_API_KEY / ANTHROPIC_API_KEY.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
