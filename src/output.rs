//! Data types produced by a translation run.
//!
//! Geometry uses a top-left page origin (y grows downward) throughout, the
//! way text extractors report positions. Only the drawing layer converts to
//! PDF's bottom-left origin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangle in page space: `(left, top, right, bottom)`, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BlockRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Grow every edge outward by `padding`. No clamping to the page.
    pub fn padded(&self, padding: f32) -> Self {
        Self {
            left: self.left - padding,
            top: self.top - padding,
            right: self.right + padding,
            bottom: self.bottom + padding,
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &BlockRect) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

impl fmt::Display for BlockRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2}, {:.2})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// A positioned run of text extracted from a source page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position of the block in extraction order (0-indexed).
    pub index: usize,
    pub rect: BlockRect,
    pub text: String,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.index, self.rect, self.text)
    }
}

/// A block after translation: the padded rectangle and the text drawn into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedBlock {
    /// Index of the source [`Block`].
    pub index: usize,
    /// Source rectangle expanded by the configured padding.
    pub rect: BlockRect,
    /// Trimmed source text that was sent for translation.
    pub original: String,
    pub translated: String,
    /// Number of laid-out lines actually drawn.
    pub lines_drawn: usize,
    /// Lines withheld by the overflow policy.
    pub lines_dropped: usize,
}

impl fmt::Display for TranslatedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:?} [{} drawn, {} dropped]",
            self.index, self.rect, self.translated, self.lines_drawn, self.lines_dropped
        )
    }
}

/// Outcome of one processed source page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    /// 1-indexed source page number.
    pub page_num: usize,
    pub width: f32,
    pub height: f32,
    /// Blocks extracted from the source page.
    pub blocks: usize,
    /// Blocks skipped because their text was blank.
    pub skipped_blocks: usize,
    /// Blocks translated and drawn.
    pub translated_blocks: usize,
    pub duration_ms: u64,
}

/// Summary of a whole run, returned once the output has been saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Page count of the source document.
    pub total_pages: usize,
    /// 1-indexed page numbers that were processed, in order.
    pub selected_pages: Vec<usize>,
    /// Page count of the destination document (always twice the processed pages).
    pub output_pages: usize,
    pub pages: Vec<PageReport>,
    pub total_duration_ms: u64,
}

impl RunSummary {
    pub fn translated_blocks(&self) -> usize {
        self.pages.iter().map(|p| p.translated_blocks).sum()
    }
}

/// Page geometry of a document, returned by [`crate::inspect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    /// `(width, height)` per page, in points.
    pub page_sizes: Vec<(f32, f32)>,
    pub pdf_version: String,
}
