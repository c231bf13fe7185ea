//! Post-processing: deterministic cleanup of model replies.
//!
//! Chat models asked for "only the translation" still sometimes wrap it in
//! quotes or code fences, or open with "Translation:". These rules remove
//! that framing without touching the translated words themselves.
//!
//! ## Rule Order
//!
//! Line endings are normalised first so the anchored regexes see plain `\n`;
//! fences are stripped before preambles, and quotes last, since a model may
//! write `Translation: "…"`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to a raw model reply.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 3. Strip an outer code fence
/// 4. Strip a leading "Translation:" style preamble
/// 5. Strip one pair of matching outer quotes
/// 6. Trim trailing whitespace per line and the whole reply
pub fn clean_translation(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = strip_code_fence(s.trim());
    let s = strip_preamble(&s);
    let s = strip_outer_quotes(s.trim());
    trim_lines(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip invisible Unicode ──────────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'))
        .collect()
}

// ── Rule 3: Strip an outer code fence ────────────────────────────────────────

static RE_OUTER_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*\n(.*?)\n?```$").unwrap());

fn strip_code_fence(input: &str) -> String {
    match RE_OUTER_FENCE.captures(input) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

// ── Rule 4: Strip a preamble ─────────────────────────────────────────────────

static RE_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:here is the translation|here's the translation|translated text|translation)(?:\s+\([^)]*\))?\s*:\s*")
        .unwrap()
});

fn strip_preamble(input: &str) -> String {
    RE_PREAMBLE.replace(input, "").into_owned()
}

// ── Rule 5: Strip outer quotes ───────────────────────────────────────────────

fn strip_outer_quotes(input: &str) -> String {
    const PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('«', '»')];
    let mut chars = input.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return input.to_string();
    };
    for (open, close) in PAIRS {
        if first == open && last == close {
            let inner = &input[open.len_utf8()..input.len() - close.len_utf8()];
            // A quote inside means the outer pair is probably content.
            if !inner.contains(open) && !inner.contains(close) {
                return inner.to_string();
            }
        }
    }
    input.to_string()
}

// ── Rule 6: Trim ─────────────────────────────────────────────────────────────

fn trim_lines(input: &str) -> String {
    input
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
