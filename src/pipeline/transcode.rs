//! Page transcoding: copy a source page and open its overlay page.
//!
//! Each processed source page adds exactly two pages to the destination, in
//! this order: a verbatim copy of the source page, then a blank page of the
//! same size that receives the translated overlay.

use crate::error::PdfTranslateError;
use crate::output::{Block, BlockRect};
use crate::pipeline::blocks::{group_segments, Segment};
use pdfium_render::prelude::*;
use tracing::debug;

/// A source page after transcoding.
pub struct TranscodedPage<'a> {
    /// 1-indexed source page number.
    pub page_num: usize,
    pub width: f32,
    pub height: f32,
    /// Text blocks of the source page, in extraction order.
    pub blocks: Vec<Block>,
    /// The blank destination page, already appended after the copy.
    pub overlay: PdfPage<'a>,
}

/// Copy source page `index` (0-indexed) into `destination`, extract its
/// blocks, and append a blank page of the same size.
pub fn transcode_page<'a>(
    source: &PdfDocument<'a>,
    destination: &mut PdfDocument<'a>,
    index: usize,
) -> Result<TranscodedPage<'a>, PdfTranslateError> {
    let page_num = index + 1;
    let total = source.pages().len() as usize;
    let source_index = u16::try_from(index)
        .ok()
        .filter(|_| index < total)
        .ok_or(PdfTranslateError::PageOutOfRange {
            page: page_num,
            total,
        })?;

    let page = source
        .pages()
        .get(source_index)
        .map_err(|e| PdfTranslateError::TextExtractionFailed {
            page: page_num,
            detail: format!("{:?}", e),
        })?;
    let width = page.width().value;
    let height = page.height().value;
    let blocks = extract_blocks(&page, page_num)?;

    let destination_index = destination.pages().len();
    destination
        .pages_mut()
        .copy_page_from_document(source, source_index, destination_index)
        .map_err(|e| PdfTranslateError::PageCopyFailed {
            page: page_num,
            detail: format!("{:?}", e),
        })?;

    let overlay = destination
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::Custom(
            PdfPoints::new(width),
            PdfPoints::new(height),
        ))
        .map_err(|e| PdfTranslateError::PageCreationFailed {
            page: page_num,
            detail: format!("{:?}", e),
        })?;

    debug!(
        "Page {}: {:.1}x{:.1}pt, {} blocks",
        page_num,
        width,
        height,
        blocks.len()
    );

    Ok(TranscodedPage {
        page_num,
        width,
        height,
        blocks,
        overlay,
    })
}

/// Extract the positioned text blocks of `page`, top-left origin.
pub fn extract_blocks(page: &PdfPage<'_>, page_num: usize) -> Result<Vec<Block>, PdfTranslateError> {
    let frame = page_frame(page);
    let text = page
        .text()
        .map_err(|e| PdfTranslateError::TextExtractionFailed {
            page: page_num,
            detail: format!("{:?}", e),
        })?;

    let segments: Vec<Segment> = text
        .segments()
        .iter()
        .map(|segment| {
            let bounds = segment.bounds();
            Segment::new(
                frame.to_page_rect(
                    bounds.left().value,
                    bounds.bottom().value,
                    bounds.right().value,
                    bounds.top().value,
                ),
                segment.text(),
            )
        })
        .collect();

    Ok(group_segments(segments))
}

/// The visible area of a page in PDF user space.
///
/// pdfium reports text bounds in user space, but page width and height
/// describe the crop box, whose lower-left corner need not be (0, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    /// User-space x of the visible area's left edge.
    pub origin_x: f32,
    /// User-space y of the visible area's bottom edge.
    pub origin_y: f32,
    /// Height of the visible area.
    pub height: f32,
}

impl PageFrame {
    /// Map a user-space rectangle to the visible page, top-left origin.
    pub fn to_page_rect(&self, left: f32, bottom: f32, right: f32, top: f32) -> BlockRect {
        BlockRect::new(
            left - self.origin_x,
            self.height - (top - self.origin_y),
            right - self.origin_x,
            self.height - (bottom - self.origin_y),
        )
    }
}

/// Frame of `page`: its crop box, else its media box, else the page size at the origin.
pub fn page_frame(page: &PdfPage<'_>) -> PageFrame {
    let boundaries = page.boundaries();
    let (origin_x, origin_y) = boundaries
        .crop()
        .or_else(|_| boundaries.media())
        .map(|b| (b.bounds.left().value, b.bounds.bottom().value))
        .unwrap_or((0.0, 0.0));

    PageFrame {
        origin_x,
        origin_y,
        height: page.height().value,
    }
}
