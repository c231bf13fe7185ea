//! End-to-end integration tests for pdftranslate.
//!
//! These tests build small PDFs with pdfium, run the page loop with a stub
//! translator, and inspect the resulting document. They need a pdfium shared
//! library and are gated behind the `E2E_ENABLED` environment variable so
//! they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/libpdfium.so cargo test --test e2e -- --nocapture

use pdfium_render::prelude::*;
use pdftranslate::pipeline::pdfium::{bind_pdfium, open_source};
use pdftranslate::{
    inspect, translate_document, translate_file_with, Block, PageReport, PdfTranslateError,
    TranslatedBlock, TranslationConfig, TranslationProgressCallback,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Test helpers ─────────────────────────────────────────────────────────────

macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

/// Page sizes of the fixture document, in points.
const FIXTURE_SIZES: [(f32, f32); 3] = [(400.0, 600.0), (595.0, 842.0), (612.0, 792.0)];

/// Build a three-page document with one line of Swedish per page.
fn build_fixture(pdfium: &Pdfium) -> PdfDocument<'_> {
    let mut document = pdfium.create_new_pdf().unwrap();
    let font = document.fonts_mut().helvetica();

    for (i, &(w, h)) in FIXTURE_SIZES.iter().enumerate() {
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(PdfPoints::new(w), PdfPoints::new(h)))
            .unwrap();
        page.objects_mut()
            .create_text_object(
                PdfPoints::new(72.0),
                PdfPoints::new(h - 100.0),
                format!("hej sida {}", i + 1),
                font,
                PdfPoints::new(12.0),
            )
            .unwrap();
    }

    document
}

fn write_fixture(path: &Path) {
    let pdfium = bind_pdfium(None).unwrap();
    build_fixture(&pdfium).save_to_file(path).unwrap();
}

fn shout(text: &str) -> Result<String, PdfTranslateError> {
    Ok(text.to_uppercase())
}

fn page_text(document: &PdfDocument<'_>, index: u16) -> String {
    document.pages().get(index).unwrap().text().unwrap().all()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn interleaves_copy_and_overlay_pages() {
    e2e_skip_unless_enabled!();

    let pdfium = bind_pdfium(None).unwrap();
    let source = build_fixture(&pdfium);
    let mut destination = pdfium.create_new_pdf().unwrap();

    let config = TranslationConfig::default();
    let summary = translate_document(&source, &mut destination, &config, &shout).unwrap();

    assert_eq!(summary.total_pages, 3);
    assert_eq!(summary.selected_pages, vec![1, 2, 3]);
    assert_eq!(summary.output_pages, 6);
    assert_eq!(destination.pages().len(), 6);

    for (i, &(w, h)) in FIXTURE_SIZES.iter().enumerate() {
        for offset in 0..2 {
            let page = destination.pages().get((2 * i + offset) as u16).unwrap();
            assert!((page.width().value - w).abs() < 0.5, "page {i} width");
            assert!((page.height().value - h).abs() < 0.5, "page {i} height");
        }
        let copy = page_text(&destination, (2 * i) as u16);
        let overlay = page_text(&destination, (2 * i + 1) as u16);
        assert!(copy.contains(&format!("hej sida {}", i + 1)), "copy: {copy:?}");
        assert!(overlay.contains(&format!("HEJ SIDA {}", i + 1)), "overlay: {overlay:?}");
    }
}

#[test]
fn start_two_skips_the_first_page() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    let output = dir.path().join("nested/out/output.pdf");
    write_fixture(&input);

    let config = TranslationConfig::builder().pages(2, 0).build().unwrap();
    let summary = translate_file_with(&input, &output, &config, &shout).unwrap();

    assert_eq!(summary.selected_pages, vec![2, 3]);
    assert_eq!(summary.output_pages, 4);
    assert!(output.exists());
    assert!(!output.with_file_name("output.pdf.tmp").exists());

    let info = inspect(&output, &config).unwrap();
    assert_eq!(info.page_count, 4);
    assert_eq!(info.page_sizes[0], info.page_sizes[1]);
    assert_eq!(info.page_sizes[2], info.page_sizes[3]);
    assert!((info.page_sizes[0].0 - 595.0).abs() < 0.5);
}

#[test]
fn end_limits_the_range() {
    e2e_skip_unless_enabled!();

    let pdfium = bind_pdfium(None).unwrap();
    let source = build_fixture(&pdfium);
    let mut destination = pdfium.create_new_pdf().unwrap();

    let config = TranslationConfig::builder().pages(1, 2).build().unwrap();
    let summary = translate_document(&source, &mut destination, &config, &shout).unwrap();

    assert_eq!(summary.selected_pages, vec![1, 2]);
    assert_eq!(destination.pages().len(), 4);
}

#[test]
fn empty_selection_writes_nothing() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    let output = dir.path().join("output.pdf");
    write_fixture(&input);

    let config = TranslationConfig::builder().pages(5, 0).build().unwrap();
    match translate_file_with(&input, &output, &config, &shout) {
        Err(PdfTranslateError::EmptySelection { start, total, .. }) => {
            assert_eq!(start, 5);
            assert_eq!(total, 3);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("translated an empty selection"),
    }
    assert!(!output.exists());
}

#[test]
fn translation_failure_aborts_without_output() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    let output = dir.path().join("output.pdf");
    write_fixture(&input);

    let calls = AtomicUsize::new(0);
    let flaky = |text: &str| {
        if calls.fetch_add(1, Ordering::SeqCst) == 1 {
            Err(PdfTranslateError::TranslationFailed {
                page: 0,
                detail: "model offline".into(),
            })
        } else {
            Ok(text.to_string())
        }
    };

    let config = TranslationConfig::default();
    match translate_file_with(&input, &output, &config, &flaky) {
        Err(PdfTranslateError::TranslationFailed { page, .. }) => assert_eq!(page, 2),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("run should have failed"),
    }
    assert!(!output.exists());
}

#[test]
fn not_a_pdf_is_rejected_before_pdfium() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    std::fs::write(&input, b"hello, not a pdf").unwrap();

    let config = TranslationConfig::default();
    let result = translate_file_with(&input, dir.path().join("out.pdf"), &config, &shout);
    assert!(matches!(result, Err(PdfTranslateError::NotAPdf { .. })));
}

/// Records every progress event as a short string.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl TranslationProgressCallback for Recorder {
    fn on_run_start(&self, total_pages: usize, selected: &[usize]) {
        self.push(format!("run {total_pages} {selected:?}"));
    }
    fn on_page_start(&self, page_num: usize, position: usize, selected: usize, _: Duration) {
        self.push(format!("start {page_num} {position}/{selected}"));
    }
    fn on_blocks_extracted(&self, page_num: usize, blocks: &[Block]) {
        self.push(format!("blocks {page_num} {}", blocks.len()));
    }
    fn on_block_translated(&self, page_num: usize, block: &TranslatedBlock) {
        self.push(format!("block {page_num} {}", block.translated));
    }
    fn on_page_translated(&self, page_num: usize, blocks: &[TranslatedBlock]) {
        self.push(format!("translated {page_num} {}", blocks.len()));
    }
    fn on_page_complete(&self, report: &PageReport) {
        self.push(format!("done {}", report.page_num));
    }
}

fn record_run(debug: bool) -> Vec<String> {
    let recorder = Arc::new(Recorder::default());
    let config = TranslationConfig::builder()
        .pages(2, 3)
        .debug(debug)
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let pdfium = bind_pdfium(None).unwrap();
    let source = build_fixture(&pdfium);
    let mut destination = pdfium.create_new_pdf().unwrap();
    translate_document(&source, &mut destination, &config, &shout).unwrap();

    recorder.events()
}

#[test]
fn debug_dumps_blocks_before_and_after_translation() {
    e2e_skip_unless_enabled!();

    assert_eq!(
        record_run(true),
        vec![
            "run 3 [2, 3]",
            "start 2 1/2",
            "blocks 2 1",
            "block 2 HEJ SIDA 2",
            "translated 2 1",
            "done 2",
            "start 3 2/2",
            "blocks 3 1",
            "block 3 HEJ SIDA 3",
            "translated 3 1",
            "done 3",
        ]
    );
}

#[test]
fn without_debug_no_block_dumps_are_emitted() {
    e2e_skip_unless_enabled!();

    assert_eq!(
        record_run(false),
        vec![
            "run 3 [2, 3]",
            "start 2 1/2",
            "done 2",
            "start 3 2/2",
            "done 3",
        ]
    );
}

#[test]
fn password_borrowed_from_config_opens_unencrypted_source() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    write_fixture(&input);

    let config = TranslationConfig::builder()
        .password(String::from("secret"))
        .build()
        .unwrap();
    let pdfium = bind_pdfium(None).unwrap();
    let source = open_source(&pdfium, &input, config.password.as_deref()).unwrap();
    assert_eq!(source.pages().len(), 3);
}

#[test]
fn cropped_page_overlay_lines_up_with_visible_area() {
    e2e_skip_unless_enabled!();

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cropped.pdf");
    let output = dir.path().join("output.pdf");
    {
        let pdfium = bind_pdfium(None).unwrap();
        let mut document = pdfium.create_new_pdf().unwrap();
        let font = document.fonts_mut().helvetica();
        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(
                PdfPoints::new(612.0),
                PdfPoints::new(792.0),
            ))
            .unwrap();
        page.objects_mut()
            .create_text_object(
                PdfPoints::new(100.0),
                PdfPoints::new(700.0),
                "hej",
                font,
                PdfPoints::new(12.0),
            )
            .unwrap();
        page.boundaries_mut()
            .set_crop(PdfRect::new_from_values(50.0, 50.0, 742.0, 562.0))
            .unwrap();
        drop(page);
        document.save_to_file(&input).unwrap();
    }

    let config = TranslationConfig::default();
    translate_file_with(&input, &output, &config, &shout).unwrap();

    let pdfium = bind_pdfium(None).unwrap();
    let translated = pdfium.load_pdf_from_file(&output, None).unwrap();
    let overlay = translated.pages().get(1).unwrap();
    assert!((overlay.width().value - 512.0).abs() < 0.5);
    assert!((overlay.height().value - 692.0).abs() < 0.5);

    let text = overlay.text().unwrap();
    let segments = text.segments();
    let segment = segments.iter().next().expect("overlay has text");
    let bounds = segment.bounds();
    // Source x 100 sits 50pt into the visible area; padding moves it left by 10.
    assert!((bounds.left().value - 40.0).abs() < 3.0, "left {}", bounds.left().value);
    assert!(bounds.bottom().value > 0.0);
    assert!(bounds.top().value < 692.0);
}
