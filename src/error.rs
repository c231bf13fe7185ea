//! Error type for the pdftranslate library.
//!
//! There is a single error type, [`PdfTranslateError`], and every variant is
//! fatal: a run either completes and writes its output document, or stops at
//! the first failure and writes nothing. Variants are grouped by the stage
//! that raises them so the CLI can print an actionable hint.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdftranslate library.
#[derive(Debug, Error)]
pub enum PdfTranslateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// `--start`/`--end` select no page at all.
    #[error("No pages selected: start {start}, end {end} (document has {total} pages)")]
    EmptySelection { start: usize, end: usize, total: usize },

    /// A selected page does not exist in the source document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium could not produce the text of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// Copying a source page into the destination document failed.
    #[error("Copying page {page} into the output failed: {detail}")]
    PageCopyFailed { page: usize, detail: String },

    /// Appending the blank overlay page failed.
    #[error("Creating the overlay page for page {page} failed: {detail}")]
    PageCreationFailed { page: usize, detail: String },

    // ── Translation errors ────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key, unknown name).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The translation call failed or returned nothing usable.
    #[error("Translation failed on page {page}: {detail}")]
    TranslationFailed { page: usize, detail: String },

    // ── Drawing errors ────────────────────────────────────────────────────
    /// The translated text could not be placed on the overlay page.
    #[error("Drawing translated text on page {page} failed: {detail}")]
    DrawFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF.
    #[error("Failed to write output file '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install pdfium for your platform (https://github.com/bblanchon/pdfium-binaries)\n\
and either place it on the system library path or point to it with:\n\
  • --pdfium-lib /path/to/libpdfium\n\
  • PDFIUM_LIB_PATH=/path/to/libpdfium\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PdfTranslateError {
    /// Attach the 1-indexed page number to an error raised without one.
    ///
    /// Translators and canvases don't know which page they serve; the page
    /// loop fills it in on the way out.
    pub fn on_page(self, page: usize) -> Self {
        match self {
            Self::TranslationFailed { detail, .. } => Self::TranslationFailed { page, detail },
            Self::DrawFailed { detail, .. } => Self::DrawFailed { page, detail },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_display() {
        let e = PdfTranslateError::EmptySelection {
            start: 5,
            end: 0,
            total: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("start 5"), "got: {msg}");
        assert!(msg.contains("3 pages"), "got: {msg}");
    }

    #[test]
    fn page_out_of_range_display() {
        let e = PdfTranslateError::PageOutOfRange { page: 7, total: 3 };
        assert!(e.to_string().contains("Page 7"));
    }

    #[test]
    fn on_page_fills_translation_page() {
        let e = PdfTranslateError::TranslationFailed {
            page: 0,
            detail: "model unavailable".into(),
        }
        .on_page(4);
        let msg = e.to_string();
        assert!(msg.contains("page 4"), "got: {msg}");
        assert!(msg.contains("model unavailable"), "got: {msg}");
    }

    #[test]
    fn on_page_leaves_other_variants_alone() {
        let e = PdfTranslateError::InvalidConfig("bad".into()).on_page(2);
        assert!(matches!(e, PdfTranslateError::InvalidConfig(_)));
    }

    #[test]
    fn binding_error_mentions_env_var() {
        let e = PdfTranslateError::PdfiumBindingFailed("not found".into());
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
