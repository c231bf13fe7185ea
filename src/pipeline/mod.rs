//! Pipeline stages for PDF translation.
//!
//! Each submodule implements one step of the per-page loop.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ pdfium ──▶ transcode ──▶ blocks ──▶ llm ──▶ compose
//! (path)    (load)     (copy+blank)  (segment)  (MT)    (draw overlay)
//! ```
//!
//! 1. [`input`]     — check the path names a readable PDF
//! 2. [`pdfium`]    — bind the library, open source, create and save destination
//! 3. [`transcode`] — copy the page, extract text, append the blank overlay page
//! 4. [`blocks`]    — group pdfium text segments into paragraph blocks
//! 5. [`llm`]       — the [`llm::Translator`] seam and its LLM implementation
//! 6. [`postprocess`] — strip quotes, fences and preambles from model replies
//! 7. [`compose`]   — pad, lay out and draw each translated block
//! 8. [`metrics`]   — base-14 glyph widths used by the layout

pub mod blocks;
pub mod compose;
pub mod input;
pub mod llm;
pub mod metrics;
pub mod pdfium;
pub mod postprocess;
pub mod transcode;
