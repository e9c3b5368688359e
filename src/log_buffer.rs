//! A scrolling text console. Write to it with `write!`, draw it with the canvas font.

use core::fmt;

use heapless::Vec;
use log::debug;

use crate::canvas::Canvas;
use crate::font::{self, FontTableLookup, Utf8Fold};

/// Up to `N` bytes of text, already folded into font codepoints, holding at most `max_lines`
/// lines. Writing past either limit drops the oldest line.
pub struct LogBuffer<const N: usize> {
    bytes: Vec<u8, N>,
    max_lines: u16,
    /// Number of `\n` in `bytes`.
    lines: u16,
    fold: Utf8Fold,
    lookup: FontTableLookup,
}

impl<const N: usize> LogBuffer<N> {
    /// An empty console showing at most `max_lines` lines (at least one).
    pub fn new(max_lines: u16) -> Self {
        LogBuffer {
            bytes: Vec::new(),
            max_lines: max_lines.max(1),
            lines: 0,
            fold: Utf8Fold::default(),
            lookup: font::utf8_latin1,
        }
    }

    /// Map written text with `lookup` instead of `font::utf8_latin1`. Applies to text written
    /// from now on.
    pub fn set_font_table_lookup(&mut self, lookup: FontTableLookup) {
        self.lookup = lookup;
        self.fold = Utf8Fold::default();
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.lines = 0;
        self.fold = Utf8Fold::default();
    }

    /// The stored codepoints, lines separated by `\n`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lines that `draw` shows.
    pub fn line_count(&self) -> u16 {
        match self.bytes.last() {
            None => 0,
            Some(b'\n') => self.lines,
            Some(_) => self.lines + 1,
        }
    }

    fn push(&mut self, code: u8) {
        let starts_line = self.bytes.last() == Some(&b'\n');
        if starts_line && self.lines >= self.max_lines {
            self.drop_oldest_line();
        }
        if self.bytes.is_full() {
            self.drop_oldest_line();
        }
        if self.bytes.push(code).is_ok() && code == b'\n' {
            self.lines += 1;
        }
    }

    /// Remove everything up to and including the first `\n`, or everything if there is none.
    fn drop_oldest_line(&mut self) {
        match self.bytes.iter().position(|&b| b == b'\n') {
            Some(end) => {
                let len = self.bytes.len();
                self.bytes.copy_within(end + 1..len, 0);
                self.bytes.truncate(len - end - 1);
                self.lines -= 1;
            }
            None => self.bytes.clear(),
        }
    }

    /// Draw the lines top to bottom starting at `(x, y)`, one font height apart, with the
    /// canvas font and alignment.
    pub fn draw(&self, canvas: &mut Canvas, x: i16, y: i16) {
        let height = match canvas.font() {
            Some(font) => font.height() as i32,
            None => {
                debug!("log buffer drawn without a font, nothing drawn");
                return;
            }
        };
        for (n, line) in self.bytes.split(|&b| b == b'\n').enumerate() {
            let line_y = (y as i32).saturating_add((n as i32).saturating_mul(height));
            canvas.draw_codes(x as i32, line_y, line);
        }
    }
}

impl<const N: usize> fmt::Write for LogBuffer<N> {
    /// Never fails. Text that does not fit scrolls older text out.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if b == b'\r' {
                continue;
            }
            if let Some(code) = (self.lookup)(&mut self.fold, b) {
                self.push(code);
            }
        }
        Ok(())
    }
}
