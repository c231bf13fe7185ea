//! Glyph metrics for the base-14 fonts used by the overlay.
//!
//! Widths are the Adobe AFM advance widths in 1/1000 em for printable ASCII
//! (`' '..='~'`). Characters outside that range fall back to a per-font
//! average, which is close enough for Latin text with diacritics.

use crate::config::StandardFont;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015,                                             // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // 'N'..'Z'
    278, 278, 278, 469, 556, 333,                                                   // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // 'n'..'z'
    334, 260, 334, 584,                                                             // '{'..'~'
];

#[rustfmt::skip]
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

const COURIER_WIDTH: u16 = 600;

impl StandardFont {
    /// Advance width of `c` in 1/1000 em.
    pub fn char_width(self, c: char) -> u16 {
        let table = match self {
            StandardFont::Courier => return COURIER_WIDTH,
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::TimesRoman => &TIMES_ROMAN_WIDTHS,
        };
        match c {
            ' '..='~' => table[c as usize - ' ' as usize],
            _ => self.fallback_width(),
        }
    }

    /// Width of `text` set at `font_size` points.
    pub fn text_width(self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * font_size / 1000.0
    }

    /// Height above the baseline of the tallest glyphs, at `font_size` points.
    pub fn ascent(self, font_size: f32) -> f32 {
        let units = match self {
            StandardFont::Helvetica => 718.0,
            StandardFont::TimesRoman => 683.0,
            StandardFont::Courier => 629.0,
        };
        units * font_size / 1000.0
    }

    /// Depth below the baseline of descenders, at `font_size` points.
    pub fn descent(self, font_size: f32) -> f32 {
        let units = match self {
            StandardFont::Helvetica => 207.0,
            StandardFont::TimesRoman => 217.0,
            StandardFont::Courier => 157.0,
        };
        units * font_size / 1000.0
    }

    fn fallback_width(self) -> u16 {
        match self {
            StandardFont::Helvetica => 556,
            StandardFont::TimesRoman => 500,
            StandardFont::Courier => COURIER_WIDTH,
        }
    }
}
