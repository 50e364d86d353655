//! Helvetica-Bold advance widths
//!
//! The PDF base-14 fonts are not embedded, so string widths for centring come
//! from the standard AFM metrics (units of 1/1000 em, WinAnsi printable ASCII).

/// Widths for characters 0x20 (space) through 0x7E (tilde), in code point order
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722, 722, 667,
    611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556,
    278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for characters outside printable ASCII
const FALLBACK_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_BOLD_ASCII[c as usize - 0x20],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` set in Helvetica-Bold at `font_size`, in points
pub fn helvetica_bold_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 * font_size / 1000.0
}
