//! Progress-callback trait for per-page translation events.
//!
//! Inject an [`Arc<dyn TranslationProgressCallback>`] via
//! [`crate::config::TranslationConfigBuilder::progress_callback`] to receive
//! events as the page loop runs. The loop is strictly sequential, so events
//! arrive in page order and never concurrently.
//!
//! # Example
//!
//! ```rust
//! use pdftranslate::{TranslationProgressCallback, TranslationConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//! use std::time::Duration;
//!
//! struct CountingCallback {
//!     started: AtomicUsize,
//! }
//!
//! impl TranslationProgressCallback for CountingCallback {
//!     fn on_page_start(&self, page_num: usize, position: usize, selected: usize, _elapsed: Duration) {
//!         self.started.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {page_num} ({position}/{selected})");
//!     }
//! }
//!
//! let config = TranslationConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { started: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{Block, PageReport, RunSummary, TranslatedBlock};
use chrono::{DateTime, Local};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Called by the page loop as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Page numbers are 1-indexed source page numbers.
pub trait TranslationProgressCallback: Send + Sync {
    /// Called once after the page range is resolved, before any page is touched.
    ///
    /// * `total_pages` — page count of the source document
    /// * `selected`    — 1-indexed page numbers that will be processed
    fn on_run_start(&self, total_pages: usize, selected: &[usize]) {
        let _ = (total_pages, selected);
    }

    /// Called at the start of each page.
    ///
    /// * `position` — 1-indexed position of this page within the selection
    /// * `selected` — number of selected pages
    /// * `elapsed`  — time since the run started
    fn on_page_start(&self, page_num: usize, position: usize, selected: usize, elapsed: Duration) {
        let _ = (page_num, position, selected, elapsed);
    }

    /// Debug mode only: the blocks extracted from the source page.
    fn on_blocks_extracted(&self, page_num: usize, blocks: &[Block]) {
        let _ = (page_num, blocks);
    }

    /// Debug mode only: one block after translation and drawing.
    fn on_block_translated(&self, page_num: usize, block: &TranslatedBlock) {
        let _ = (page_num, block);
    }

    /// Debug mode only: every block drawn onto the overlay page.
    fn on_page_translated(&self, page_num: usize, blocks: &[TranslatedBlock]) {
        let _ = (page_num, blocks);
    }

    /// Called when a page has been copied, translated and drawn.
    fn on_page_complete(&self, report: &PageReport) {
        let _ = report;
    }

    /// Called once after the output document has been saved.
    fn on_run_complete(&self, summary: &RunSummary, output: &Path) {
        let _ = (summary, output);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl TranslationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TranslationConfig`].
pub type ProgressCallback = Arc<dyn TranslationProgressCallback>;

// ── Formatting helpers ───────────────────────────────────────────────────

/// Format a duration as `HH:MM:SS.mmm`. Hours are not wrapped at 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = elapsed.subsec_millis();
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Format a wall-clock instant as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// The per-page progress line:
/// `[2024-05-01 10:00:00] (Elapsed: 00:00:01.250) Processing page 3 (2/5)`.
pub fn page_progress_line(
    now: DateTime<Local>,
    elapsed: Duration,
    page_num: usize,
    position: usize,
    selected: usize,
) -> String {
    format!(
        "[{}] (Elapsed: {}) Processing page {page_num} ({position}/{selected})",
        format_timestamp(now),
        format_elapsed(elapsed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        selected_total: AtomicUsize,
    }

    impl TranslationProgressCallback for TrackingCallback {
        fn on_run_start(&self, _total_pages: usize, selected: &[usize]) {
            self.selected_total.store(selected.len(), Ordering::SeqCst);
        }

        fn on_page_start(&self, _page_num: usize, _pos: usize, _sel: usize, _elapsed: Duration) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _report: &PageReport) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(3, &[2, 3]);
        cb.on_page_start(2, 1, 2, Duration::ZERO);
        cb.on_blocks_extracted(2, &[]);
        cb.on_page_translated(2, &[]);
        cb.on_page_complete(&PageReport {
            page_num: 2,
            width: 100.0,
            height: 100.0,
            blocks: 0,
            skipped_blocks: 0,
            translated_blocks: 0,
            duration_ms: 0,
        });
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            selected_total: AtomicUsize::new(0),
        };
        let cb: &dyn TranslationProgressCallback = &tracker;
        cb.on_run_start(10, &[4, 5, 6]);
        for (i, page) in [4, 5, 6].into_iter().enumerate() {
            cb.on_page_start(page, i + 1, 3, Duration::from_millis(5));
        }
        assert_eq!(tracker.selected_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn elapsed_is_zero_padded() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00.000");
        assert_eq!(format_elapsed(Duration::from_millis(1_250)), "00:00:01.250");
        assert_eq!(
            format_elapsed(Duration::from_millis(3_723_004)),
            "01:02:03.004"
        );
    }

    #[test]
    fn elapsed_hours_do_not_wrap() {
        assert_eq!(
            format_elapsed(Duration::from_secs(25 * 3600 + 1)),
            "25:00:01.000"
        );
    }

    #[test]
    fn progress_line_layout() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let line = page_progress_line(now, Duration::from_millis(1_250), 3, 2, 5);
        assert_eq!(
            line,
            "[2024-05-01 10:00:00] (Elapsed: 00:00:01.250) Processing page 3 (2/5)"
        );
    }
}
