//! # pdftranslate
//!
//! Translate the text of a PDF and lay the translation out on a copy of
//! each page.
//!
//! For every selected source page the output gets two pages: the original,
//! copied verbatim, followed by a blank page of the same size where each
//! text block of the original is redrawn in translation at the same
//! position. Reading the output side by side gives original and translation
//! in register.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate the path and the %PDF header
//!  ├─ 2. Load       bind pdfium, open source, create empty destination
//!  ├─ 3. Transcode  copy page N, append a blank page of the same size
//!  ├─ 4. Blocks     group text segments into positioned blocks
//!  ├─ 5. Translate  one model call per non-blank block
//!  ├─ 6. Compose    pad, wrap, and draw into the block's rectangle
//!  └─ 7. Save       write the destination once, atomically
//! ```
//!
//! The run is sequential: one page at a time, one block at a time. Any
//! failure aborts the run and no output file is written.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdftranslate::{translate_file, TranslationConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / OLLAMA_HOST …
//!     let config = TranslationConfig::builder()
//!         .languages("Swedish", "English")
//!         .pages(2, 0)
//!         .build()?;
//!     let summary = translate_file("docs/input.pdf", "docs/output.pdf", &config)?;
//!     eprintln!("{} blocks translated", summary.translated_blocks());
//!     Ok(())
//! }
//! ```
//!
//! Any `Fn(&str) -> Result<String, PdfTranslateError>` is a [`Translator`],
//! which makes [`translate_file_with`] handy for glossaries and tests:
//!
//! ```rust,no_run
//! use pdftranslate::{translate_file_with, PdfTranslateError, TranslationConfig};
//!
//! # fn main() -> Result<(), PdfTranslateError> {
//! let config = TranslationConfig::default();
//! let upper = |text: &str| Ok::<_, PdfTranslateError>(text.to_uppercase());
//! translate_file_with("in.pdf", "out.pdf", &config, &upper)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdftranslate` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! ## Runtime requirement
//!
//! pdfium is loaded at runtime. Point `PDFIUM_LIB_PATH` (or
//! [`TranslationConfigBuilder::pdfium_lib_path`]) at `libpdfium`, or install
//! it on the system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod translate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    resolve_page_range, OverflowPolicy, PageRange, StandardFont, TranslationConfig,
    TranslationConfigBuilder,
};
pub use error::PdfTranslateError;
pub use output::{Block, BlockRect, DocumentInfo, PageReport, RunSummary, TranslatedBlock};
pub use pipeline::llm::{LlmTranslator, Translator};
pub use progress::{NoopProgressCallback, ProgressCallback, TranslationProgressCallback};
pub use translate::{inspect, translate_document, translate_file, translate_file_with};
