//! Translation entry points.
//!
//! [`translate_file`] is the whole program: validate the input, set up the
//! model, open both documents, run the page loop, save once. Nothing is
//! written unless every page succeeds.
//!
//! [`translate_document`] is the page loop on its own, for callers that
//! manage pdfium documents themselves.

use crate::config::TranslationConfig;
use crate::error::PdfTranslateError;
use crate::output::{DocumentInfo, PageReport, RunSummary};
use crate::pipeline::compose::{compose_block, font_token, ComposeOptions, PdfiumCanvas};
use crate::pipeline::llm::{LlmTranslator, Translator};
use crate::pipeline::{input, pdfium, transcode};
use crate::progress::{NoopProgressCallback, ProgressCallback};
use pdfium_render::prelude::PdfDocument;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Translate `input` into `output` using the LLM configured in `config`.
///
/// The provider is resolved before the PDF is opened, so a missing API key
/// or unreachable model fails fast.
///
/// # Errors
/// Any failure is fatal and leaves `output` untouched.
pub fn translate_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<RunSummary, PdfTranslateError> {
    let translator = LlmTranslator::from_config(config)?;
    translate_file_with(input, output, config, &translator)
}

/// Translate `input` into `output` with a caller-supplied translator.
pub fn translate_file_with(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &TranslationConfig,
    translator: &dyn Translator,
) -> Result<RunSummary, PdfTranslateError> {
    let run_start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();
    info!("Starting translation: {}", input.display());

    // ── Step 1: Load ─────────────────────────────────────────────────────
    let pdf_path = input::resolve_local(input)?;
    let pdfium = pdfium::bind_pdfium(config.pdfium_lib_path.as_deref())?;
    let source = pdfium::open_source(&pdfium, &pdf_path, config.password.as_deref())?;
    let mut destination = pdfium::create_destination(&pdfium)?;

    // ── Step 2: Page loop ────────────────────────────────────────────────
    let mut summary = run_pages(&source, &mut destination, config, translator, run_start)?;

    // ── Step 3: Save, once ───────────────────────────────────────────────
    pdfium::save_document(&destination, output)?;
    summary.total_duration_ms = run_start.elapsed().as_millis() as u64;

    info!(
        "Translation complete: {} pages, {} blocks, {}ms total → {}",
        summary.pages.len(),
        summary.translated_blocks(),
        summary.total_duration_ms,
        output.display()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(&summary, output);
    }

    Ok(summary)
}

/// Run the page loop from `source` into `destination` without saving.
///
/// For every selected page `destination` gains the verbatim copy followed by
/// the translated overlay page.
pub fn translate_document<'a>(
    source: &PdfDocument<'a>,
    destination: &mut PdfDocument<'a>,
    config: &TranslationConfig,
    translator: &dyn Translator,
) -> Result<RunSummary, PdfTranslateError> {
    run_pages(source, destination, config, translator, Instant::now())
}

/// Page count and sizes of a PDF. Needs pdfium but no translation model.
pub fn inspect(
    input: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<DocumentInfo, PdfTranslateError> {
    let pdf_path = input::resolve_local(input)?;
    let pdfium = pdfium::bind_pdfium(config.pdfium_lib_path.as_deref())?;
    let document = pdfium::open_source(&pdfium, &pdf_path, config.password.as_deref())?;
    Ok(pdfium::document_info(&document))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn run_pages<'a>(
    source: &PdfDocument<'a>,
    destination: &mut PdfDocument<'a>,
    config: &TranslationConfig,
    translator: &dyn Translator,
    run_start: Instant,
) -> Result<RunSummary, PdfTranslateError> {
    let callback: ProgressCallback = config
        .progress_callback
        .clone()
        .unwrap_or_else(|| Arc::new(NoopProgressCallback));

    // ── Resolve page range ───────────────────────────────────────────────
    let total_pages = source.pages().len() as usize;
    let indices = config.pages.to_indices(total_pages);
    if indices.is_empty() {
        return Err(PdfTranslateError::EmptySelection {
            start: config.pages.start,
            end: config.pages.end,
            total: total_pages,
        });
    }
    let selected: Vec<usize> = indices.iter().map(|i| i + 1).collect();
    info!("Source has {} pages; processing {:?}", total_pages, selected);
    callback.on_run_start(total_pages, &selected);

    let font = font_token(destination, config.font);
    let options = ComposeOptions::from(config);
    let mut reports = Vec::with_capacity(indices.len());

    for (position, &index) in indices.iter().enumerate() {
        let page_start = Instant::now();
        let page_num = index + 1;
        callback.on_page_start(page_num, position + 1, indices.len(), run_start.elapsed());

        let page = transcode::transcode_page(source, destination, index)?;
        if config.debug {
            callback.on_blocks_extracted(page_num, &page.blocks);
        }

        let mut canvas = PdfiumCanvas::new(page.overlay, font);
        let mut translated = Vec::with_capacity(page.blocks.len());
        let mut skipped = 0;

        for block in &page.blocks {
            let composed = compose_block(block, translator, &mut canvas, &options)
                .map_err(|e| e.on_page(page_num))?;
            match composed {
                Some(t) => {
                    debug!("Page {}: block {} → {:?}", page_num, t.index, t.translated);
                    if config.debug {
                        callback.on_block_translated(page_num, &t);
                    }
                    translated.push(t);
                }
                None => skipped += 1,
            }
        }

        if config.debug {
            callback.on_page_translated(page_num, &translated);
        }
        debug!(
            "Page {}: {} text objects drawn",
            page_num,
            canvas.objects_drawn()
        );
        // Dropping the page commits its new content.
        drop(canvas);

        let report = PageReport {
            page_num,
            width: page.width,
            height: page.height,
            blocks: page.blocks.len(),
            skipped_blocks: skipped,
            translated_blocks: translated.len(),
            duration_ms: page_start.elapsed().as_millis() as u64,
        };
        callback.on_page_complete(&report);
        reports.push(report);
    }

    Ok(RunSummary {
        total_pages,
        selected_pages: selected,
        output_pages: destination.pages().len() as usize,
        pages: reports,
        total_duration_ms: run_start.elapsed().as_millis() as u64,
    })
}
