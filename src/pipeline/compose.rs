//! Block compositing: translate one block and draw it onto the overlay page.
//!
//! ## Layout
//!
//! The translated string is word-wrapped to the width of the padded block
//! rectangle using the base-14 glyph widths from [`super::metrics`]. Explicit
//! newlines in the translation start a new line. The first baseline sits one
//! ascent below the rectangle top; following lines are `font_size ×
//! LINE_HEIGHT_FACTOR` apart. Text is left-aligned at the rectangle's left
//! edge.
//!
//! A line fits when its descent stays above the rectangle bottom. What happens
//! to lines that don't is decided by [`OverflowPolicy`].
//!
//! Drawing goes through the [`Canvas`] trait so layout and skipping rules can
//! be exercised without a pdfium library; [`PdfiumCanvas`] is the real one.

use crate::config::{OverflowPolicy, StandardFont, TranslationConfig};
use crate::error::PdfTranslateError;
use crate::output::{Block, BlockRect, TranslatedBlock};
use crate::pipeline::llm::Translator;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

/// Distance between consecutive baselines, as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// One line of text placed on the page, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    /// Baseline y, measured down from the page top.
    pub baseline: f32,
}

/// Result of laying out a string inside a rectangle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    /// Lines to draw, top to bottom. Blank lines are not included.
    pub lines: Vec<PlacedLine>,
    /// Non-blank lines withheld by the overflow policy.
    pub dropped: usize,
}

/// A drawing surface for translated text.
pub trait Canvas {
    /// Draw `line` on top of whatever the page already shows.
    fn draw_text(&mut self, line: &PlacedLine, font_size: f32) -> Result<(), PdfTranslateError>;
}

/// Drawing parameters, copied out of [`TranslationConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposeOptions {
    pub padding: f32,
    pub font: StandardFont,
    pub font_size: f32,
    pub overflow: OverflowPolicy,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self::from(&TranslationConfig::default())
    }
}

impl From<&TranslationConfig> for ComposeOptions {
    fn from(config: &TranslationConfig) -> Self {
        Self {
            padding: config.padding,
            font: config.font,
            font_size: config.font_size,
            overflow: config.overflow,
        }
    }
}

/// Translate `block` and draw the result into its padded rectangle.
///
/// Returns `Ok(None)` without calling the translator when the block's text
/// is blank. The rectangle is the block's own rectangle grown by
/// `options.padding` on every side; it is not clamped to the page.
pub fn compose_block(
    block: &Block,
    translator: &dyn Translator,
    canvas: &mut dyn Canvas,
    options: &ComposeOptions,
) -> Result<Option<TranslatedBlock>, PdfTranslateError> {
    let original = block.text.trim();
    if original.is_empty() {
        debug!("Block {}: blank, skipped", block.index);
        return Ok(None);
    }

    let translated = translator.translate(original)?;
    let rect = block.rect.padded(options.padding);
    let layout = layout_text(
        &translated,
        &rect,
        options.font,
        options.font_size,
        options.overflow,
    )?;

    if layout.dropped > 0 {
        warn!(
            "Block {}: {} line(s) do not fit {} and were {}",
            block.index,
            layout.dropped,
            rect,
            match options.overflow {
                OverflowPolicy::Skip => "skipped with the whole block",
                _ => "clipped",
            }
        );
    }

    for line in &layout.lines {
        canvas.draw_text(line, options.font_size)?;
    }

    Ok(Some(TranslatedBlock {
        index: block.index,
        rect,
        original: original.to_string(),
        translated,
        lines_drawn: layout.lines.len(),
        lines_dropped: layout.dropped,
    }))
}

/// Lay out `text` inside `rect` according to `overflow`.
///
/// # Errors
/// [`PdfTranslateError::DrawFailed`] if the rectangle has no area.
pub fn layout_text(
    text: &str,
    rect: &BlockRect,
    font: StandardFont,
    font_size: f32,
    overflow: OverflowPolicy,
) -> Result<TextLayout, PdfTranslateError> {
    if !(rect.width() > 0.0 && rect.height() > 0.0) {
        return Err(PdfTranslateError::DrawFailed {
            page: 0,
            detail: format!("invalid text rectangle {rect}"),
        });
    }

    let wrapped: Vec<String> = text
        .lines()
        .flat_map(|line| word_wrap(line, rect.width(), font, font_size))
        .collect();

    let ascent = font.ascent(font_size);
    let descent = font.descent(font_size);
    let line_height = font_size * LINE_HEIGHT_FACTOR;

    let mut layout = TextLayout::default();
    for (i, text) in wrapped.into_iter().enumerate() {
        let baseline = rect.top + ascent + i as f32 * line_height;
        let fits = baseline + descent <= rect.bottom;
        if text.is_empty() {
            continue;
        }
        if fits || overflow == OverflowPolicy::Overflow {
            layout.lines.push(PlacedLine {
                text,
                x: rect.left,
                baseline,
            });
        } else {
            layout.dropped += 1;
        }
    }

    if overflow == OverflowPolicy::Skip && layout.dropped > 0 {
        layout.dropped += layout.lines.len();
        layout.lines.clear();
    }

    Ok(layout)
}

/// Word-wrap one line of text to `max_width` points.
///
/// Words wider than `max_width` are broken at character boundaries. An empty
/// input yields a single empty line so paragraph breaks keep their height.
pub fn word_wrap(text: &str, max_width: f32, font: StandardFont, font_size: f32) -> Vec<String> {
    let space_width = font.text_width(" ", font_size);
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width: f32 = 0.0;

    for word in text.split_whitespace() {
        let word_width = font.text_width(word, font_size);

        if word_width > max_width {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            let mut chunk = String::new();
            let mut chunk_width: f32 = 0.0;
            for c in word.chars() {
                let char_width = f32::from(font.char_width(c)) * font_size / 1000.0;
                if chunk_width + char_width > max_width && !chunk.is_empty() {
                    lines.push(std::mem::take(&mut chunk));
                    chunk_width = 0.0;
                }
                chunk.push(c);
                chunk_width += char_width;
            }
            current_line = chunk;
            current_width = chunk_width;
            continue;
        }

        if current_line.is_empty() {
            current_line = word.to_string();
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push(std::mem::replace(&mut current_line, word.to_string()));
            current_width = word_width;
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        lines.push(current_line);
    }

    lines
}

// ── pdfium canvas ────────────────────────────────────────────────────────

/// Resolve the pdfium token for one of the built-in fonts of `document`.
pub fn font_token(document: &mut PdfDocument<'_>, font: StandardFont) -> PdfFontToken {
    let fonts = document.fonts_mut();
    match font {
        StandardFont::Helvetica => fonts.helvetica(),
        StandardFont::Courier => fonts.courier(),
        StandardFont::TimesRoman => fonts.times_roman(),
    }
}

/// Draws onto a pdfium page as new text objects appended above existing content.
pub struct PdfiumCanvas<'a> {
    page: PdfPage<'a>,
    font: PdfFontToken,
    page_height: f32,
    objects: usize,
}

impl<'a> PdfiumCanvas<'a> {
    pub fn new(page: PdfPage<'a>, font: PdfFontToken) -> Self {
        let page_height = page.height().value;
        Self {
            page,
            font,
            page_height,
            objects: 0,
        }
    }

    /// Number of text objects drawn so far.
    pub fn objects_drawn(&self) -> usize {
        self.objects
    }
}

impl Canvas for PdfiumCanvas<'_> {
    fn draw_text(&mut self, line: &PlacedLine, font_size: f32) -> Result<(), PdfTranslateError> {
        // PDF user space has its origin bottom-left.
        let y = self.page_height - line.baseline;
        self.page
            .objects_mut()
            .create_text_object(
                PdfPoints::new(line.x),
                PdfPoints::new(y),
                line.text.as_str(),
                self.font,
                PdfPoints::new(font_size),
            )
            .map_err(|e| PdfTranslateError::DrawFailed {
                page: 0,
                detail: format!("{:?}", e),
            })?;
        self.objects += 1;
        Ok(())
    }
}
