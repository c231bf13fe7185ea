//! Input validation: make sure a path names a readable PDF before pdfium sees it.
//!
//! pdfium reports every open failure as a generic format error. Checking
//! existence, permissions and the `%PDF` magic bytes up front turns the
//! common mistakes into specific, actionable errors.

use crate::error::PdfTranslateError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists, is readable, and starts with `%PDF`.
pub fn resolve_local(path: impl AsRef<Path>) -> Result<PathBuf, PdfTranslateError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
        return Err(PdfTranslateError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            match f.read_exact(&mut magic) {
                Ok(()) if &magic != b"%PDF" => {
                    return Err(PdfTranslateError::NotAPdf { path, magic });
                }
                Ok(()) => {}
                // Shorter than four bytes: certainly not a PDF.
                Err(_) => return Err(PdfTranslateError::NotAPdf { path, magic }),
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfTranslateError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfTranslateError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
