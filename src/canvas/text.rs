//! Text layout and rendering with a bitmap `Font`.

use log::debug;

use super::Canvas;
use crate::font::{self, Font, FontTableLookup};

/// Where the `(x, y)` anchor of a string sits relative to the rendered text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextAlignment {
    /// Anchor is the top left corner.
    Left,
    /// Anchor is the top right corner.
    Right,
    /// Anchor is the middle of the top edge.
    Center,
    /// Anchor is the middle of the text block, horizontally and vertically.
    CenterBoth,
}

/// Width measurement for a font and codepoint mapping, detached from any canvas so callers can
/// lay out text before drawing.
#[derive(Clone, Copy)]
pub struct TextMetrics {
    font: Font<'static>,
    lookup: FontTableLookup,
}

impl TextMetrics {
    pub fn new(font: Font<'static>, lookup: FontTableLookup) -> Self {
        TextMetrics { font, lookup }
    }

    pub fn font(&self) -> Font<'static> {
        self.font
    }

    /// Width of a single line: the sum of the advances of its codepoints.
    pub fn line_width(&self, line: &str) -> u16 {
        font::decode(line, self.lookup)
            .map(|code| self.font.advance(code))
            .fold(0u16, u16::saturating_add)
    }

    /// Width of `text`, the widest of its `\n` separated lines.
    pub fn string_width(&self, text: &str) -> u16 {
        text.split('\n')
            .map(|line| self.line_width(line))
            .max()
            .unwrap_or(0)
    }

    /// Break `text` into lines no wider than `max_width` at spaces and hyphens. The break
    /// character itself is not part of either line. A word that is wider than `max_width` on
    /// its own is kept whole on a line of its own.
    pub fn wrap<'t>(&self, max_width: u16, text: &'t str) -> WrappedLines<'t> {
        WrappedLines {
            metrics: *self,
            max_width,
            text,
            start: 0,
            pos: 0,
            last_fit: None,
            pending: None,
            done: false,
        }
    }
}

/// Iterator over greedily wrapped lines, see `TextMetrics::wrap`.
pub struct WrappedLines<'t> {
    metrics: TextMetrics,
    max_width: u16,
    text: &'t str,
    /// Start of the line being built.
    start: usize,
    /// Where to search for the next break point.
    pos: usize,
    /// Furthest break point at which the current line still fits.
    last_fit: Option<usize>,
    /// A second line completed by the same break point.
    pending: Option<&'t str>,
    done: bool,
}

impl<'t> WrappedLines<'t> {
    fn fits(&self, end: usize) -> bool {
        self.metrics.line_width(&self.text[self.start..end]) <= self.max_width
    }
}

impl<'t> Iterator for WrappedLines<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }

        while !self.done {
            // The end of the text counts as a final break point.
            let brk = match self.text[self.pos..].find(|c: char| c == ' ' || c == '-') {
                Some(off) => self.pos + off,
                None => {
                    self.done = true;
                    self.text.len()
                }
            };
            self.pos = brk + 1;

            if self.fits(brk) {
                self.last_fit = Some(brk);
                continue;
            }

            let mut emitted = None;
            if let Some(end) = self.last_fit.take() {
                emitted = Some(&self.text[self.start..end]);
                self.start = end + 1;
            }
            if self.fits(brk) {
                self.last_fit = Some(brk);
            } else {
                let line = &self.text[self.start..brk];
                self.start = brk + 1;
                if emitted.is_none() {
                    emitted = Some(line);
                } else {
                    self.pending = Some(line);
                }
            }
            if emitted.is_some() {
                return emitted;
            }
        }

        let end = self.last_fit.take()?;
        Some(&self.text[self.start..end])
    }
}

impl Canvas {
    /// Set the font used by the text operations.
    pub fn set_font(&mut self, font: Font<'static>) {
        self.font = Some(font);
    }

    pub fn font(&self) -> Option<Font<'static>> {
        self.font
    }

    pub fn set_text_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
    }

    pub fn text_alignment(&self) -> TextAlignment {
        self.alignment
    }

    /// Replace the mapping from input bytes to font codepoints. The default is
    /// `font::utf8_latin1`.
    pub fn set_font_table_lookup(&mut self, lookup: FontTableLookup) {
        self.lookup = lookup;
    }

    pub fn font_table_lookup(&self) -> FontTableLookup {
        self.lookup
    }

    /// Metrics for the current font, `None` if no font is set.
    pub fn text_metrics(&self) -> Option<TextMetrics> {
        self.font.map(|font| TextMetrics::new(font, self.lookup))
    }

    /// Rendered width of `text` in the current font, 0 without a font.
    pub fn string_width(&self, text: &str) -> u16 {
        self.text_metrics().map_or(0, |m| m.string_width(text))
    }

    /// Draw `text` anchored at `(x, y)` according to the current alignment. Each `\n` starts a
    /// new line one glyph height lower.
    pub fn draw_string(&mut self, x: i16, y: i16, text: &str) {
        let metrics = match self.text_metrics() {
            Some(m) => m,
            None => {
                debug!("draw_string called without a font, nothing drawn");
                return;
            }
        };
        let line_height = metrics.font().height() as i32;

        let mut y = y as i32;
        if self.alignment == TextAlignment::CenterBoth {
            let breaks = text.matches('\n').count() as i32;
            y -= breaks * line_height / 2;
        }

        for (n, line) in text.split('\n').enumerate() {
            let width = metrics.line_width(line) as i32;
            let codes = font::decode(line, self.lookup);
            let line_y = y.saturating_add((n as i32).saturating_mul(line_height));
            self.draw_glyphs(metrics.font(), x as i32, line_y, width, codes);
        }
    }

    /// Draw `text` wrapped to `max_width` pixels, see `TextMetrics::wrap`.
    pub fn draw_string_max_width(&mut self, x: i16, y: i16, max_width: u16, text: &str) {
        let metrics = match self.text_metrics() {
            Some(m) => m,
            None => {
                debug!("draw_string_max_width called without a font, nothing drawn");
                return;
            }
        };
        let line_height = metrics.font().height() as i32;
        for (n, line) in metrics.wrap(max_width, text).enumerate() {
            let width = metrics.line_width(line) as i32;
            let codes = font::decode(line, self.lookup);
            let line_y = (y as i32).saturating_add((n as i32).saturating_mul(line_height));
            self.draw_glyphs(metrics.font(), x as i32, line_y, width, codes);
        }
    }

    /// Draw one line of already mapped font codepoints.
    pub(crate) fn draw_codes(&mut self, x: i32, y: i32, codes: &[u8]) {
        let font = match self.font {
            Some(f) => f,
            None => return,
        };
        let width = codes
            .iter()
            .map(|&c| font.advance(c))
            .fold(0u16, u16::saturating_add) as i32;
        self.draw_glyphs(font, x, y, width, codes.iter().cloned());
    }

    fn draw_glyphs<I>(&mut self, font: Font<'static>, x: i32, y: i32, width: i32, codes: I)
    where
        I: Iterator<Item = u8>,
    {
        let height = font.height() as i32;
        let (x, y) = match self.alignment {
            TextAlignment::Left => (x, y),
            TextAlignment::Right => (x - width, y),
            TextAlignment::Center => (x - width / 2, y),
            TextAlignment::CenterBoth => (x - width / 2, y - height / 2),
        };

        if x + width < 0
            || x > self.width() as i32
            || y + height < 0
            || y > self.height() as i32
        {
            return;
        }

        let mut cursor = x;
        for glyph in codes.filter_map(|code| font.glyph(code)) {
            if let Some(bitmap) = glyph.bitmap {
                self.blit(cursor, y, glyph.width as i32, height, bitmap);
            }
            cursor += glyph.width as i32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::testing::{lit_count, lit_in_col, lit_in_row};
    use crate::config::Geometry;
    use crate::font::testing;
    use std::vec::Vec;

    fn canvas() -> Canvas {
        let mut c = Canvas::new(Geometry::W128H64);
        c.set_font(testing::font());
        c
    }

    fn metrics() -> TextMetrics {
        TextMetrics::new(testing::font(), font::utf8_latin1)
    }

    #[test]
    fn width_is_sum_of_advances() {
        let c = canvas();
        assert_eq!(c.string_width("AB-"), 5 + 5 + 3);
        assert_eq!(c.string_width("A B"), 13);
        assert_eq!(c.string_width(""), 0);
        assert_eq!(c.string_width("AB\nABCD\nA"), 20);
    }

    #[test]
    fn drawn_extent_matches_width() {
        let mut c = canvas();
        c.draw_string(0, 0, "AB|");
        let width = c.string_width("AB|") as i16;
        let last = *lit_in_row(&c, 0).last().unwrap();
        // The bar is a single column inside its 2 pixel advance.
        assert_eq!(last, width - 2);
        assert_eq!(lit_in_row(&c, 0), vec![0, 1, 2, 3, 5, 6, 7, 8, 10]);
    }

    #[test]
    fn out_of_range_codepoints_are_skipped() {
        let mut c = canvas();
        assert_eq!(c.string_width("\u{e4}"), 0);
        c.draw_string(0, 0, "\u{e4}A");
        assert_eq!(lit_in_row(&c, 0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn alignment_shifts_anchor() {
        let mut c = canvas();
        c.set_text_alignment(TextAlignment::Right);
        c.draw_string(20, 0, "AA");
        assert_eq!(lit_in_row(&c, 0), vec![10, 11, 12, 13, 15, 16, 17, 18]);

        let mut c = canvas();
        c.set_text_alignment(TextAlignment::Center);
        c.draw_string(20, 0, "AA");
        assert_eq!(lit_in_row(&c, 0)[0], 15);
    }

    #[test]
    fn center_both_centers_block() {
        let mut c = canvas();
        c.set_text_alignment(TextAlignment::CenterBoth);
        c.draw_string(64, 32, "A\nA");
        assert_eq!(lit_in_col(&c, 62), (24..40).collect::<Vec<_>>());
        assert_eq!(lit_in_row(&c, 24), vec![62, 63, 64, 65]);
    }

    #[test]
    fn newline_moves_down_one_line() {
        let mut c = canvas();
        c.draw_string(0, 0, "A\nAA");
        assert_eq!(lit_in_row(&c, 7).len(), 4);
        assert_eq!(lit_in_row(&c, 8).len(), 8);
    }

    #[test]
    fn partially_visible_text_is_clipped() {
        let mut c = canvas();
        c.draw_string(-3, 0, "A");
        assert_eq!(lit_in_row(&c, 0), vec![0]);
        c.draw_string(126, 60, "A");
        assert_eq!(lit_in_row(&c, 63), vec![126, 127]);
    }

    #[test]
    fn text_without_font_draws_nothing() {
        let mut c = Canvas::new(Geometry::W128H64);
        c.draw_string(0, 0, "AB");
        c.draw_string_max_width(0, 0, 10, "AB CD");
        assert_eq!(lit_count(&c), 0);
        assert_eq!(c.string_width("AB"), 0);
    }

    #[test]
    fn glyphs_straddle_pages() {
        for &y in &[5i16, -3] {
            let mut c = Canvas::new(Geometry::W128H64);
            c.set_font(testing::with_height(16));
            c.draw_string(0, y, "A");
            let rows: Vec<i16> = (y..y + 16).filter(|&r| r >= 0).collect();
            assert_eq!(lit_in_col(&c, 0), rows, "y = {}", y);
            assert_eq!(lit_in_col(&c, 1), rows, "y = {}", y);
        }
    }

    #[test]
    fn wrap_two_words_per_line() {
        let m = metrics();
        let max = m.line_width("AAAA BBBB");
        assert_eq!(max, 43);
        let text = "AAAA BBBB CCCC";
        let lines: Vec<&str> = m.wrap(max, text).collect();
        assert_eq!(lines, vec!["AAAA BBBB", "CCCC"]);
        assert!(lines.iter().all(|l| m.line_width(l) <= max));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_one_word_per_line() {
        let m = metrics();
        let text = "AAAA BBBB CCCC";
        let lines: Vec<&str> = m.wrap(20, text).collect();
        assert_eq!(lines, vec!["AAAA", "BBBB", "CCCC"]);
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_keeps_overlong_word_whole() {
        let m = metrics();
        let lines: Vec<&str> = m.wrap(12, "AB ABCDEFGH CD").collect();
        assert_eq!(lines, vec!["AB", "ABCDEFGH", "CD"]);
    }

    #[test]
    fn wrap_breaks_at_hyphen() {
        let m = metrics();
        let lines: Vec<&str> = m.wrap(10, "AA-BB").collect();
        assert_eq!(lines, vec!["AA", "BB"]);
        let lines: Vec<&str> = m.wrap(100, "AA-BB").collect();
        assert_eq!(lines, vec!["AA-BB"]);
    }

    #[test]
    fn max_width_draws_lines_below_each_other() {
        let mut c = canvas();
        c.draw_string_max_width(0, 0, 20, "AAAA BBBB");
        assert_eq!(lit_in_row(&c, 0).len(), 16);
        assert_eq!(lit_in_row(&c, 8).len(), 16);
        assert_eq!(lit_in_row(&c, 16).len(), 0);
    }

    #[test]
    fn text_near_coordinate_limits_is_clipped() {
        let mut c = canvas();
        c.draw_string(i16::MAX - 1, 0, "A");
        c.draw_string(i16::MAX, i16::MAX, "A\nA\nA");
        c.set_text_alignment(TextAlignment::Right);
        c.draw_string(i16::MIN, 0, "AAAA");
        c.set_text_alignment(TextAlignment::CenterBoth);
        c.draw_string(i16::MIN + 1, i16::MIN + 1, "A\nA");
        c.draw_string_max_width(0, i16::MAX - 4, 10, "AA AA AA");
        assert_eq!(lit_count(&c), 0);
    }
}
