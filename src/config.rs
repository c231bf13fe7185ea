//! Configuration types for a translation run.
//!
//! All run behaviour is controlled through [`TranslationConfig`], built via
//! its [`TranslationConfigBuilder`]. Defaults reproduce the classic tool:
//! Swedish → English, 10 pt padding, Helvetica at 8 pt, every page.

use crate::error::PdfTranslateError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default margin added to each side of a block before drawing.
pub const DEFAULT_PADDING: f32 = 10.0;

/// Default overlay font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 8.0;

/// Configuration for a PDF translation run.
///
/// Built via [`TranslationConfig::builder()`] or using
/// [`TranslationConfig::default()`].
///
/// # Example
/// ```rust
/// use pdftranslate::{OverflowPolicy, TranslationConfig};
///
/// let config = TranslationConfig::builder()
///     .pages(2, 0)
///     .languages("German", "English")
///     .overflow(OverflowPolicy::Skip)
///     .build()
///     .unwrap();
/// assert_eq!(config.pages.start, 2);
/// ```
#[derive(Clone)]
pub struct TranslationConfig {
    /// Pages to process. Default: every page.
    pub pages: PageRange,

    /// Margin added to every edge of a block rectangle. Default: 10.
    ///
    /// Translations are rarely the same length as their source; the margin
    /// gives the longer ones room before the overflow policy kicks in.
    pub padding: f32,

    /// Standard font used for the overlay. Default: Helvetica.
    pub font: StandardFont,

    /// Overlay font size in points. Range: 4–72. Default: 8.
    pub font_size: f32,

    /// What to do with lines that don't fit the padded rectangle. Default: clip.
    pub overflow: OverflowPolicy,

    /// Report extracted and translated blocks through the progress callback.
    pub debug: bool,

    /// Language of the source document. Default: "Swedish".
    pub source_lang: String,

    /// Language to translate into. Default: "English".
    pub target_lang: String,

    /// LLM model identifier. If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "ollama", "openai").
    /// If None along with `provider`, the provider is detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for each translation call. Default: 0.1.
    pub temperature: f32,

    /// Maximum tokens generated per block. Default: 1024.
    pub max_tokens: usize,

    /// Custom system prompt. If None, uses the built-in translation prompt.
    pub system_prompt: Option<String>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit pdfium library to bind. If None, `PDFIUM_LIB_PATH` and then
    /// the system library are tried.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Receives per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            pages: PageRange::default(),
            padding: DEFAULT_PADDING,
            font: StandardFont::default(),
            font_size: DEFAULT_FONT_SIZE,
            overflow: OverflowPolicy::default(),
            debug: false,
            source_lang: "Swedish".to_string(),
            target_lang: "English".to_string(),
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.1,
            max_tokens: 1024,
            system_prompt: None,
            password: None,
            pdfium_lib_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("pages", &self.pages)
            .field("padding", &self.padding)
            .field("font", &self.font)
            .field("font_size", &self.font_size)
            .field("overflow", &self.overflow)
            .field("debug", &self.debug)
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn TranslationProgressCallback>"),
            )
            .finish()
    }
}

impl TranslationConfig {
    /// Create a new builder for `TranslationConfig`.
    pub fn builder() -> TranslationConfigBuilder {
        TranslationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TranslationConfig`].
#[derive(Debug)]
pub struct TranslationConfigBuilder {
    config: TranslationConfig,
}

impl TranslationConfigBuilder {
    /// 1-indexed first and last page; `end == 0` means "to the last page".
    pub fn pages(mut self, start: usize, end: usize) -> Self {
        self.config.pages = PageRange { start, end };
        self
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.config.padding = padding;
        self
    }

    pub fn font(mut self, font: StandardFont) -> Self {
        self.config.font = font;
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.config.font_size = size;
        self
    }

    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow = policy;
        self
    }

    pub fn debug(mut self, v: bool) -> Self {
        self.config.debug = v;
        self
    }

    pub fn languages(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.config.source_lang = source.into();
        self.config.target_lang = target.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslationConfig, PdfTranslateError> {
        let c = &self.config;
        if c.pages.start < 1 {
            return Err(PdfTranslateError::InvalidConfig(
                "Pages are 1-indexed, start must be ≥ 1".into(),
            ));
        }
        if !c.padding.is_finite() || c.padding < 0.0 {
            return Err(PdfTranslateError::InvalidConfig(format!(
                "Padding must be a finite value ≥ 0, got {}",
                c.padding
            )));
        }
        if !(4.0..=72.0).contains(&c.font_size) {
            return Err(PdfTranslateError::InvalidConfig(format!(
                "Font size must be 4–72, got {}",
                c.font_size
            )));
        }
        if c.source_lang.trim().is_empty() || c.target_lang.trim().is_empty() {
            return Err(PdfTranslateError::InvalidConfig(
                "Source and target language must be named".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(PdfTranslateError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Page range ───────────────────────────────────────────────────────────

/// 1-indexed page range as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    /// First page, 1-indexed.
    pub start: usize,
    /// Last page, 1-indexed. 0, or anything past the last page, means "to the end".
    pub end: usize,
}

impl Default for PageRange {
    fn default() -> Self {
        Self { start: 1, end: 0 }
    }
}

impl PageRange {
    /// Expand into 0-indexed page indices for a document of `total_pages`.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        resolve_page_range(total_pages, self.start, self.end)
    }
}

/// Resolve a 1-indexed `start`/`end` pair into ordered 0-indexed page indices.
///
/// `end` in `1..=total_pages` is inclusive; any other `end` runs to the last
/// page. `start` is not checked against `end` or `total_pages`: a start past
/// the end yields an empty list. A `start` of 0 behaves as 1.
pub fn resolve_page_range(total_pages: usize, start: usize, end: usize) -> Vec<usize> {
    let first = start.saturating_sub(1);
    let stop = if end > 0 && end <= total_pages {
        end
    } else {
        total_pages
    };
    (first..stop).collect()
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Standard PDF font used for the translated overlay.
///
/// Only the base-14 families are offered: they need no embedding and their
/// glyph widths are fixed, so line wrapping is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StandardFont {
    #[default]
    Helvetica,
    Courier,
    TimesRoman,
}

/// Behaviour when translated text is taller than its padded rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Draw the lines that fit, drop the rest. (default)
    #[default]
    Clip,
    /// Draw nothing for a block whose text doesn't fit.
    Skip,
    /// Draw every line, continuing below the rectangle.
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_document_by_default() {
        assert_eq!(resolve_page_range(5, 1, 0), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageRange::default().to_indices(3), vec![0, 1, 2]);
    }

    #[test]
    fn end_within_document_is_inclusive() {
        assert_eq!(resolve_page_range(10, 3, 6), vec![2, 3, 4, 5]);
        assert_eq!(resolve_page_range(10, 4, 4), vec![3]);
        assert_eq!(resolve_page_range(10, 1, 10), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn end_past_document_runs_to_last_page() {
        assert_eq!(resolve_page_range(3, 2, 0), vec![1, 2]);
        assert_eq!(resolve_page_range(3, 2, 99), vec![1, 2]);
    }

    #[test]
    fn start_past_document_selects_nothing() {
        assert!(resolve_page_range(3, 5, 0).is_empty());
    }

    #[test]
    fn start_after_end_selects_nothing() {
        assert!(resolve_page_range(10, 6, 3).is_empty());
    }

    #[test]
    fn zero_start_behaves_as_first_page() {
        assert_eq!(resolve_page_range(2, 0, 0), vec![0, 1]);
    }

    #[test]
    fn range_length_matches_inclusive_count() {
        for total in 1..8 {
            for s in 1..=total {
                for e in s..=total {
                    let got = resolve_page_range(total, s, e);
                    assert_eq!(got.len(), e - s + 1);
                    assert_eq!(got.first(), Some(&(s - 1)));
                    assert_eq!(got.last(), Some(&(e - 1)));
                }
            }
        }
    }

    #[test]
    fn builder_defaults() {
        let c = TranslationConfig::builder().build().unwrap();
        assert_eq!(c.padding, 10.0);
        assert_eq!(c.font_size, 8.0);
        assert_eq!(c.font, StandardFont::Helvetica);
        assert_eq!(c.overflow, OverflowPolicy::Clip);
        assert_eq!(c.source_lang, "Swedish");
        assert_eq!(c.target_lang, "English");
        assert_eq!(c.pages, PageRange { start: 1, end: 0 });
    }

    #[test]
    fn builder_rejects_zero_start() {
        let err = TranslationConfig::builder().pages(0, 0).build().unwrap_err();
        assert!(matches!(err, PdfTranslateError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_bad_font_size() {
        assert!(TranslationConfig::builder().font_size(2.0).build().is_err());
        assert!(TranslationConfig::builder().font_size(100.0).build().is_err());
    }

    #[test]
    fn builder_rejects_negative_padding() {
        assert!(TranslationConfig::builder().padding(-1.0).build().is_err());
        assert!(TranslationConfig::builder().padding(f32::NAN).build().is_err());
        assert!(TranslationConfig::builder().padding(0.0).build().is_ok());
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = TranslationConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }
}
