//! The drawing surface handed to frames and overlays. A `Canvas` owns the pixel buffer together
//! with the drawing state (color, font, text alignment and font table lookup) that the drawing
//! primitives consult.

pub mod image;
pub mod primitives;
pub mod text;

use crate::buffer::{Color, PixelBuffer};
use crate::config::Geometry;
use crate::font::{self, Font, FontTableLookup};

pub use self::text::{TextAlignment, TextMetrics, WrappedLines};

pub struct Canvas {
    buffer: PixelBuffer,
    color: Color,
    font: Option<Font<'static>>,
    alignment: TextAlignment,
    lookup: FontTableLookup,
}

impl Canvas {
    /// Create a cleared canvas for an already validated geometry.
    pub fn new(geometry: Geometry) -> Self {
        Canvas {
            buffer: PixelBuffer::new(geometry),
            color: Color::White,
            font: None,
            alignment: TextAlignment::Left,
            lookup: font::utf8_latin1,
        }
    }

    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    /// Set how subsequent drawing operations combine into the buffer.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Draw a single pixel in the current color. Off-screen pixels are ignored.
    pub fn set_pixel(&mut self, x: i16, y: i16) {
        self.buffer.set_pixel(x, y, self.color);
    }

    /// `set_pixel` for coordinates computed in `i32`, which may lie beyond the `i16` range.
    pub(crate) fn plot(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && x < self.width() as i32 && y < self.height() as i32 {
            self.set_pixel(x as i16, y as i16);
        }
    }

    /// Read back a pixel, `None` when off-screen.
    pub fn pixel(&self, x: i16, y: i16) -> Option<bool> {
        self.buffer.pixel(x, y)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Canvas;
    use std::vec::Vec;

    /// The x coordinates of lit pixels in row `y`.
    pub fn lit_in_row(canvas: &Canvas, y: i16) -> Vec<i16> {
        (0..canvas.width() as i16)
            .filter(|&x| canvas.pixel(x, y) == Some(true))
            .collect()
    }

    /// The y coordinates of lit pixels in column `x`.
    pub fn lit_in_col(canvas: &Canvas, x: i16) -> Vec<i16> {
        (0..canvas.height() as i16)
            .filter(|&y| canvas.pixel(x, y) == Some(true))
            .collect()
    }

    pub fn lit_count(canvas: &Canvas) -> u32 {
        canvas
            .buffer()
            .bytes()
            .iter()
            .map(|b| b.count_ones())
            .sum()
    }
}
