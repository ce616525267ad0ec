//! Text measurement.
//!
//! Measuring text is the expensive part of layout. The engine never measures
//! on its own: it consumes a [`TextMeasurer`] supplied by the presentation
//! layer. [`MonospaceMeasurer`] is a display-width based fallback used by the
//! driver binary and tests.

use unicode_width::UnicodeWidthStr;

/// Font metrics relevant to height measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Point size.
    pub size: f64,
    /// Height of one rendered line.
    pub line_height: f64,
}

impl FontSpec {
    /// Font with the given size and line height.
    pub const fn new(size: f64, line_height: f64) -> Self {
        Self { size, line_height }
    }
}

/// Measures the height of a block of text.
///
/// Implementations must be pure: same input, same output, no side effects.
/// The engine calls them from blocking worker threads during precomputation.
pub trait TextMeasurer: Send + Sync {
    /// Height of `text` wrapped to `max_width`, limited to `max_lines` lines
    /// (`0` = unlimited).
    fn measure(&self, text: &str, font: &FontSpec, max_width: f64, max_lines: usize) -> f64;
}

/// Measurer assuming every display column has the same advance.
///
/// Columns per line are `floor(max_width / (font.size * advance_ratio))`.
/// Lines wrap on display width (`unicode-width`), so wide CJK glyphs count
/// as two columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Advance of one column relative to the font size.
    pub advance_ratio: f64,
}

impl MonospaceMeasurer {
    /// Measurer with the given column advance ratio.
    pub fn new(advance_ratio: f64) -> Self {
        Self { advance_ratio }
    }

    fn columns(&self, font: &FontSpec, max_width: f64) -> usize {
        let advance = font.size * self.advance_ratio;
        if !(advance > 0.0) || !(max_width > 0.0) {
            return 1;
        }
        ((max_width / advance).floor() as usize).max(1)
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font: &FontSpec, max_width: f64, max_lines: usize) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let columns = self.columns(font, max_width);
        let lines: usize = text
            .split('\n')
            .map(|paragraph| wrapped_line_count(paragraph, columns))
            .sum();
        let lines = if max_lines == 0 { lines } else { lines.min(max_lines) };
        lines as f64 * font.line_height
    }
}

/// Number of lines a paragraph occupies when greedily wrapped at word
/// boundaries to `columns` display columns.
fn wrapped_line_count(paragraph: &str, columns: usize) -> usize {
    let mut lines = 1;
    let mut used = 0;
    for word in paragraph.split(' ') {
        let width = word.width();
        let needed = if used == 0 { width } else { used + 1 + width };
        if needed <= columns {
            used = needed;
            continue;
        }
        if used > 0 {
            lines += 1;
        }
        // Words longer than a line are hard-broken.
        if width > columns {
            lines += (width - 1) / columns;
            used = width - (width - 1) / columns * columns;
        } else {
            used = width;
        }
    }
    lines
}
