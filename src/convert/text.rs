//! Text size estimation
//!
//! No font is loaded; widths come from a per-character heuristic tuned for
//! Excalifont. Narrow glyphs count 0.35 em, wide ones 0.8 em, a space 0.3 em
//! and everything else 0.55 em.

use crate::layout::Size;

/// Line height used when none is given
pub const DEFAULT_LINE_HEIGHT: f64 = 1.25;

const NARROW: &str = "ilj1!|.,;:'\"()[]{}";
const WIDE: &str = "MWmw@%";
const HORIZONTAL_PADDING: f64 = 8.0;
const VERTICAL_PADDING: f64 = 4.0;

fn char_width_em(c: char) -> f64 {
    if NARROW.contains(c) {
        0.35
    } else if WIDE.contains(c) {
        0.8
    } else if c == ' ' {
        0.3
    } else {
        0.55
    }
}

/// Estimated box of `text` at `font_size`
///
/// Width is the widest line plus padding; height is one `line_height` per
/// line plus padding.
pub fn measure_text(text: &str, font_size: f64, line_height: f64) -> Size {
    let widest = text
        .split('\n')
        .map(|line| line.chars().map(char_width_em).sum::<f64>() * font_size)
        .fold(0.0, f64::max);
    let lines = text.split('\n').count() as f64;

    Size::new(
        widest + HORIZONTAL_PADDING,
        lines * font_size * line_height + VERTICAL_PADDING,
    )
}
