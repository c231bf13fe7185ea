//! Block segmentation: group pdfium text segments into paragraph blocks.
//!
//! pdfium reports text as *segments*: runs of characters on a single line,
//! each with a bounding rectangle, in content-stream reading order. A block
//! is a run of consecutive segments that belong together visually:
//!
//! * a segment on the **same line** as the previous one (vertical overlap)
//!   and horizontally close to it is appended with a space;
//! * a segment starting the **next line** (small vertical gap, horizontal
//!   overlap with the block) opens a new line in the same block;
//! * anything else closes the block.
//!
//! Blocks keep the order of their first segment.

use crate::output::{Block, BlockRect};

/// Maximum vertical gap between two lines of one block, in line heights.
const BLOCK_LINE_GAP_FACTOR: f32 = 0.8;

/// Maximum horizontal gap between two segments of one line, in line heights.
const SAME_LINE_GAP_FACTOR: f32 = 2.0;

/// Minimum vertical overlap (fraction of the shorter height) for "same line".
const SAME_LINE_OVERLAP: f32 = 0.5;

/// A single-line run of text with its bounds, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub rect: BlockRect,
    pub text: String,
}

impl Segment {
    pub fn new(rect: BlockRect, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
        }
    }
}

/// Block under construction.
struct OpenBlock {
    rect: BlockRect,
    /// Bounds of the line currently being extended.
    line: BlockRect,
    lines: Vec<String>,
}

impl OpenBlock {
    fn start(segment: Segment) -> Self {
        Self {
            rect: segment.rect,
            line: segment.rect,
            lines: vec![segment.text],
        }
    }

    fn extend_line(&mut self, segment: Segment) {
        if let Some(current) = self.lines.last_mut() {
            let needs_space = !current.is_empty()
                && !current.ends_with(char::is_whitespace)
                && !segment.text.starts_with(char::is_whitespace);
            if needs_space {
                current.push(' ');
            }
            current.push_str(&segment.text);
        }
        self.line = self.line.union(&segment.rect);
        self.rect = self.rect.union(&segment.rect);
    }

    fn push_line(&mut self, segment: Segment) {
        self.line = segment.rect;
        self.rect = self.rect.union(&segment.rect);
        self.lines.push(segment.text);
    }

    fn finish(self, index: usize) -> Block {
        Block {
            index,
            rect: self.rect,
            text: self.lines.join("\n"),
        }
    }
}

/// Group segments, in reading order, into blocks.
pub fn group_segments(segments: impl IntoIterator<Item = Segment>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock> = None;

    for segment in segments {
        open = Some(match open.take() {
            None => OpenBlock::start(segment),
            Some(mut block) => {
                if on_same_line(&block.line, &segment.rect) {
                    block.extend_line(segment);
                    block
                } else if on_next_line(&block.rect, &block.line, &segment.rect) {
                    block.push_line(segment);
                    block
                } else {
                    blocks.push(block.finish(blocks.len()));
                    OpenBlock::start(segment)
                }
            }
        });
    }

    if let Some(block) = open {
        blocks.push(block.finish(blocks.len()));
    }
    blocks
}

fn line_height(rect: &BlockRect) -> f32 {
    rect.height().max(1.0)
}

fn on_same_line(line: &BlockRect, seg: &BlockRect) -> bool {
    let overlap = line.bottom.min(seg.bottom) - line.top.max(seg.top);
    let shorter = line_height(line).min(line_height(seg));
    if overlap < shorter * SAME_LINE_OVERLAP {
        return false;
    }
    let gap = seg.left - line.right;
    let height = line_height(line);
    gap <= height * SAME_LINE_GAP_FACTOR && gap >= -height
}

fn on_next_line(block: &BlockRect, line: &BlockRect, seg: &BlockRect) -> bool {
    let gap = seg.top - line.bottom;
    if gap < -line_height(line) * (1.0 - SAME_LINE_OVERLAP) {
        return false;
    }
    if gap > line_height(line) * BLOCK_LINE_GAP_FACTOR {
        return false;
    }
    seg.left < block.right && seg.right > block.left
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(left: f32, top: f32, right: f32, bottom: f32, text: &str) -> Segment {
        Segment::new(BlockRect::new(left, top, right, bottom), text)
    }

    #[test]
    fn empty_page_has_no_blocks() {
        assert!(group_segments(Vec::new()).is_empty());
    }

    #[test]
    fn wrapped_paragraph_is_one_block() {
        let blocks = group_segments(vec![
            seg(72.0, 100.0, 400.0, 112.0, "Årsredovisningen för"),
            seg(72.0, 114.0, 380.0, 126.0, "räkenskapsåret 2023"),
        ]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Årsredovisningen för\nräkenskapsåret 2023");
        assert_eq!(blocks[0].rect, BlockRect::new(72.0, 100.0, 400.0, 126.0));
        assert_eq!(blocks[0].index, 0);
    }

    #[test]
    fn distant_paragraphs_split() {
        let blocks = group_segments(vec![
            seg(72.0, 100.0, 400.0, 112.0, "Rubrik"),
            seg(72.0, 160.0, 400.0, 172.0, "Brödtext"),
        ]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "Rubrik");
        assert_eq!(blocks[1].text, "Brödtext");
        assert_eq!(blocks[1].index, 1);
    }

    #[test]
    fn same_line_fragments_join_with_space() {
        let blocks = group_segments(vec![
            seg(72.0, 100.0, 120.0, 112.0, "Hej"),
            seg(124.0, 100.0, 170.0, 112.0, "världen"),
        ]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text, "Hej världen");
    }

    #[test]
    fn existing_whitespace_is_not_doubled() {
        let blocks = group_segments(vec![
            seg(72.0, 100.0, 120.0, 112.0, "Hej "),
            seg(124.0, 100.0, 170.0, 112.0, "där"),
        ]);
        assert_eq!(blocks[0].text, "Hej där");
    }

    #[test]
    fn columns_stay_separate() {
        // Same baseline, but far apart horizontally.
        let blocks = group_segments(vec![
            seg(72.0, 100.0, 250.0, 112.0, "Vänster spalt"),
            seg(320.0, 100.0, 520.0, 112.0, "Höger spalt"),
        ]);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn next_line_without_horizontal_overlap_splits() {
        let blocks = group_segments(vec![
            seg(72.0, 100.0, 200.0, 112.0, "Left"),
            seg(300.0, 114.0, 400.0, 126.0, "Right, below"),
        ]);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn reading_order_is_kept() {
        let blocks = group_segments(vec![
            seg(72.0, 700.0, 200.0, 712.0, "Footer"),
            seg(72.0, 100.0, 200.0, 112.0, "Header"),
        ]);
        let texts: Vec<_> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["Footer", "Header"]);
    }

    #[test]
    fn whitespace_segments_are_kept() {
        let blocks = group_segments(vec![seg(72.0, 100.0, 80.0, 112.0, "   ")]);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].text.trim().is_empty());
    }
}
