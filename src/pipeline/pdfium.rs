//! Document loading and saving via pdfium.
//!
//! pdfium is a C++ library bound at runtime. [`bind_pdfium`] looks for it in
//! this order:
//!
//! 1. an explicit path (`--pdfium-lib`)
//! 2. `PDFIUM_LIB_PATH`
//! 3. the system library search path
//!
//! Documents borrow the [`Pdfium`] handle, so the caller keeps it alive for
//! the whole run.

use crate::error::PdfTranslateError;
use crate::output::DocumentInfo;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bind to a pdfium library.
pub fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, PdfTranslateError> {
    if let Some(path) = explicit {
        return bind_from_path(path);
    }

    if let Ok(env_path) = std::env::var("PDFIUM_LIB_PATH") {
        if !env_path.is_empty() {
            return bind_from_path(Path::new(&env_path));
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| PdfTranslateError::PdfiumBindingFailed(format!("system library: {e}")))
}

fn bind_from_path(path: &Path) -> Result<Pdfium, PdfTranslateError> {
    if !path.exists() {
        return Err(PdfTranslateError::PdfiumBindingFailed(format!(
            "'{}' does not exist",
            path.display()
        )));
    }
    debug!("Binding pdfium from {}", path.display());
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| PdfTranslateError::PdfiumBindingFailed(format!("'{}': {e}", path.display())))
}

/// Open the source document read-only.
pub fn open_source<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdfTranslateError> {
    let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdfTranslateError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PdfTranslateError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PdfTranslateError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    info!(
        "PDF loaded: {} ({} pages)",
        pdf_path.display(),
        document.pages().len()
    );
    Ok(document)
}

/// Create the empty destination document.
pub fn create_destination(pdfium: &Pdfium) -> Result<PdfDocument<'_>, PdfTranslateError> {
    pdfium
        .create_new_pdf()
        .map_err(|e| PdfTranslateError::Internal(format!("Failed to create output document: {:?}", e)))
}

/// Page count and page sizes of an open document.
pub fn document_info(document: &PdfDocument<'_>) -> DocumentInfo {
    let page_sizes: Vec<(f32, f32)> = document
        .pages()
        .iter()
        .map(|page| (page.width().value, page.height().value))
        .collect();

    DocumentInfo {
        page_count: page_sizes.len(),
        page_sizes,
        pdf_version: format!("{:?}", document.version()),
    }
}

/// Save `document` to `path`, creating parent directories.
///
/// Atomic write: the document is saved next to the target and renamed into
/// place, so a failed save never leaves a truncated output behind.
pub fn save_document(document: &PdfDocument<'_>, path: &Path) -> Result<(), PdfTranslateError> {
    let write_err = |detail: String| PdfTranslateError::OutputWriteFailed {
        path: path.to_path_buf(),
        detail,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }

    let tmp_path = temp_path_for(path);
    if let Err(e) = document.save_to_file(&tmp_path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_err(format!("{:?}", e)));
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        write_err(e.to_string())
    })?;

    info!("Saved {} ({} pages)", path.display(), document.pages().len());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "output.pdf".into());
    name.push(".tmp");
    path.with_file_name(name)
}
