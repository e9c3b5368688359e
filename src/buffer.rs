//! The in-memory pixel buffer, stored in the page layout used by page-addressed controllers.
//!
//! A page is a horizontal strip of 8 pixel rows. Each byte holds one column of one page, with the
//! least significant bit being the topmost pixel, so the byte at `x + page * width` holds pixels
//! `(x, page * 8)` through `(x, page * 8 + 7)`.

use crate::config::Geometry;
use crate::diff::{self, DirtyRegion};

/// Maximum number of buffer bytes, enough for a 128x64 panel.
pub const BUFFER_CAPACITY: usize = 1024;

/// How a drawing operation combines its bits into the buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    /// Bits are OR-ed in, turning pixels on.
    White,
    /// Bits are cleared (AND with the complement), turning pixels off.
    Black,
    /// Bits are XOR-ed in, toggling pixels.
    Inverse,
}

impl Color {
    /// Combine the set bits of `bits` into `byte`.
    #[inline]
    pub fn combine(self, byte: &mut u8, bits: u8) {
        match self {
            Color::White => *byte |= bits,
            Color::Black => *byte &= !bits,
            Color::Inverse => *byte ^= bits,
        }
    }
}

/// A monochrome front buffer plus the back buffer holding what was last sent to the panel.
#[derive(Clone)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    front: [u8; BUFFER_CAPACITY],
    back: [u8; BUFFER_CAPACITY],
    /// The back buffer no longer matches the panel, the next differential flush sends all.
    resend: bool,
}

impl PixelBuffer {
    /// Create a cleared buffer for `geometry`. The geometry must already be validated, see
    /// `Geometry::validate`.
    pub fn new(geometry: Geometry) -> Self {
        let (width, height) = geometry.size();
        PixelBuffer {
            width,
            height,
            front: [0; BUFFER_CAPACITY],
            back: [0; BUFFER_CAPACITY],
            resend: false,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of pages, rounding a partial bottom page up.
    pub fn pages(&self) -> u16 {
        (self.height + 7) / 8
    }

    /// Number of bytes in use, `pages * width`.
    pub fn len(&self) -> usize {
        self.pages() as usize * self.width as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The front buffer bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.front[..self.len()]
    }

    /// The front buffer bytes, mutably.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len();
        &mut self.front[..len]
    }

    /// Turn every pixel of the front buffer off.
    pub fn clear(&mut self) {
        for b in self.bytes_mut() {
            *b = 0;
        }
    }

    /// Byte index for an on-screen pixel.
    #[inline]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || y < 0 || x as u16 >= self.width || y as u16 >= self.height {
            return None;
        }
        Some(x as usize + (y as usize / 8) * self.width as usize)
    }

    /// Combine one pixel into the buffer. Off-screen coordinates are silently ignored.
    pub fn set_pixel(&mut self, x: i16, y: i16, color: Color) {
        if let Some(i) = self.index(x, y) {
            color.combine(&mut self.front[i], 1 << (y as u8 & 7));
        }
    }

    /// Read back a pixel, `None` when off-screen.
    pub fn pixel(&self, x: i16, y: i16) -> Option<bool> {
        self.index(x, y)
            .map(|i| self.front[i] & (1 << (y as u8 & 7)) != 0)
    }

    /// Combine `bits` into the byte at column `x` of `page`. Out of range addresses are skipped.
    #[inline]
    pub(crate) fn combine_byte(&mut self, x: i16, page: i16, bits: u8, color: Color) {
        if x < 0 || page < 0 || x as u16 >= self.width || page as u16 >= self.pages() {
            return;
        }
        let i = x as usize + page as usize * self.width as usize;
        color.combine(&mut self.front[i], bits);
    }

    /// Compute the changed area since the last call and bring the back buffer up to date. See
    /// `diff::compute_dirty_region`. After `mark_unsent` this is the whole buffer.
    pub fn take_dirty_region(&mut self) -> Option<DirtyRegion> {
        let len = self.len();
        let pages = self.pages();
        if self.resend {
            self.sync_back();
            return Some(DirtyRegion::full(self.width, pages));
        }
        diff::compute_dirty_region(&self.front[..len], &mut self.back[..len], self.width, pages)
    }

    /// Mark the whole front buffer as transmitted.
    pub fn sync_back(&mut self) {
        let len = self.len();
        self.back[..len].copy_from_slice(&self.front[..len]);
        self.resend = false;
    }

    /// The last transmission did not reach the panel: treat everything as changed until the
    /// next flush.
    pub fn mark_unsent(&mut self) {
        self.resend = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_layout() {
        let mut buf = PixelBuffer::new(Geometry::W128H64);
        buf.set_pixel(0, 0, Color::White);
        buf.set_pixel(3, 9, Color::White);
        buf.set_pixel(127, 63, Color::White);
        assert_eq!(buf.bytes()[0], 0x01);
        assert_eq!(buf.bytes()[3 + 128], 0x02);
        assert_eq!(buf.bytes()[127 + 7 * 128], 0x80);
        assert_eq!(buf.len(), 1024);
    }

    #[test]
    fn off_screen_pixels_are_ignored() {
        let mut buf = PixelBuffer::new(Geometry::W128H32);
        buf.set_pixel(-1, 0, Color::White);
        buf.set_pixel(0, -1, Color::White);
        buf.set_pixel(128, 0, Color::White);
        buf.set_pixel(0, 32, Color::White);
        assert!(buf.bytes().iter().all(|b| *b == 0));
        assert_eq!(buf.pixel(0, 32), None);
    }

    #[test]
    fn set_then_clear_restores() {
        let mut buf = PixelBuffer::new(Geometry::W64H48);
        for &(x, y) in &[(0, 0), (5, 7), (63, 47), (20, 30)] {
            buf.set_pixel(x, y, Color::White);
            assert_eq!(buf.pixel(x, y), Some(true));
            buf.set_pixel(x, y, Color::Black);
            assert_eq!(buf.pixel(x, y), Some(false));
        }
    }

    #[test]
    fn double_invert_restores() {
        let mut buf = PixelBuffer::new(Geometry::W128H64);
        buf.set_pixel(10, 10, Color::White);
        for &(x, y) in &[(10, 10), (11, 10)] {
            let before = buf.pixel(x, y);
            buf.set_pixel(x, y, Color::Inverse);
            assert_ne!(buf.pixel(x, y), before);
            buf.set_pixel(x, y, Color::Inverse);
            assert_eq!(buf.pixel(x, y), before);
        }
    }

    #[test]
    fn partial_page_rounds_up() {
        let buf = PixelBuffer::new(Geometry::Custom {
            width: 84,
            height: 44,
        });
        assert_eq!(buf.pages(), 6);
        assert_eq!(buf.len(), 504);
    }

    #[test]
    fn unsent_buffer_is_dirty_everywhere() {
        let mut buf = PixelBuffer::new(Geometry::W128H32);
        buf.set_pixel(5, 5, Color::White);
        assert!(buf.take_dirty_region().is_some());
        assert_eq!(buf.take_dirty_region(), None);

        buf.mark_unsent();
        assert_eq!(buf.take_dirty_region(), Some(DirtyRegion::full(128, 4)));
        assert_eq!(buf.take_dirty_region(), None);
    }
}
