//! Bitmap blitting at arbitrary pixel positions.

use super::Canvas;

impl Canvas {
    /// Blit `data`, a `width` x `height` bitmap in page layout (`ceil(height / 8)` bytes per
    /// column, LSB on top), with its top left corner at `(x, y)`. `data` may hold fewer bytes
    /// than the full bitmap, as glyphs with trailing empty columns do.
    ///
    /// A source byte straddles two destination pages unless `y` is a multiple of 8. For negative
    /// `y` the remainder is negative too: the first byte of each column is shifted down into the
    /// topmost page it touches and the rest of the column continues one page up with a positive
    /// offset.
    pub(crate) fn blit(&mut self, x: i32, y: i32, width: i32, height: i32, data: &[u8]) {
        if width <= 0 || height <= 0 {
            return;
        }
        let (screen_w, screen_h) = (self.width() as i32, self.height() as i32);
        if y + height < 0 || y > screen_h || (x + width) < 0 || x > screen_w {
            return;
        }

        let raster = 1 + (height - 1) / 8;
        let initial_offset = y % 8;
        let color = self.color;

        let mut y_cur = y;
        let mut offset = initial_offset;
        for (i, &byte) in data.iter().enumerate() {
            let i = i as i32;
            if i % raster == 0 {
                y_cur = y;
                offset = initial_offset;
            }
            let col = x + i / raster;
            if col < 0 || col >= screen_w {
                continue;
            }
            let col = col as i16;
            let page = (y_cur / 8 + i % raster) as i16;

            if offset >= 0 {
                let wide = (byte as u16) << offset;
                self.buffer.combine_byte(col, page, wide as u8, color);
                self.buffer
                    .combine_byte(col, page + 1, (wide >> 8) as u8, color);
            } else {
                self.buffer.combine_byte(col, page, byte >> -offset, color);
                y_cur -= 8;
                offset += 8;
            }
        }
    }

    /// Draw a bitmap in page layout, `ceil(height / 8)` bytes per column. Bytes beyond
    /// `width * ceil(height / 8)` are ignored.
    pub fn draw_fast_image(&mut self, x: i16, y: i16, width: i16, height: i16, image: &[u8]) {
        if width <= 0 || height <= 0 {
            return;
        }
        let raster = 1 + (height as usize - 1) / 8;
        let len = image.len().min(width as usize * raster);
        self.blit(x as i32, y as i32, width as i32, height as i32, &image[..len]);
    }

    /// Draw an XBM bitmap: rows of `ceil(width / 8)` bytes, least significant bit leftmost.
    /// Only set bits are drawn. A short `xbm` slice draws as much as it holds.
    pub fn draw_xbm(&mut self, x: i16, y: i16, width: i16, height: i16, xbm: &[u8]) {
        if width <= 0 || height <= 0 {
            return;
        }
        let row_bytes = (width as usize + 7) / 8;
        for row in 0..height as usize {
            for col in 0..width as usize {
                let byte = match xbm.get(row * row_bytes + col / 8) {
                    Some(b) => *b,
                    None => return,
                };
                if byte >> (col % 8) & 1 != 0 {
                    self.plot(x as i32 + col as i32, y as i32 + row as i32);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;
    use crate::canvas::testing::{lit_count, lit_in_col};
    use crate::config::Geometry;
    use std::vec::Vec;

    fn canvas() -> Canvas {
        Canvas::new(Geometry::W128H64)
    }

    #[test]
    fn aligned_blit_copies_bytes() {
        let mut c = canvas();
        c.draw_fast_image(3, 8, 2, 16, &[0x01, 0x80, 0xF0, 0x0F]);
        let bytes = c.buffer().bytes();
        assert_eq!(bytes[3 + 128], 0x01);
        assert_eq!(bytes[3 + 2 * 128], 0x80);
        assert_eq!(bytes[4 + 128], 0xF0);
        assert_eq!(bytes[4 + 2 * 128], 0x0F);
        assert_eq!(lit_count(&c), 10);
    }

    #[test]
    fn unaligned_blit_straddles_pages() {
        let mut c = canvas();
        c.draw_fast_image(0, 5, 1, 16, &[0xFF, 0xFF]);
        assert_eq!(lit_in_col(&c, 0), (5..21).collect::<Vec<_>>());
    }

    #[test]
    fn negative_y_clips_top_rows() {
        for &y in &[-3i16, -10, -8, -1] {
            let mut c = canvas();
            c.draw_fast_image(0, y, 1, 24, &[0xFF, 0x00, 0xFF]);
            let expected: Vec<i16> = (y..y + 8).chain(y + 16..y + 24).filter(|&r| r >= 0).collect();
            assert_eq!(lit_in_col(&c, 0), expected, "y = {}", y);
        }
    }

    #[test]
    fn bottom_edge_clips() {
        let mut c = canvas();
        c.draw_fast_image(0, 60, 1, 8, &[0xFF]);
        assert_eq!(lit_in_col(&c, 0), vec![60, 61, 62, 63]);
    }

    #[test]
    fn horizontal_clipping() {
        let mut c = canvas();
        c.draw_fast_image(-1, 0, 3, 8, &[0xFF, 0x01, 0x01]);
        assert_eq!(lit_count(&c), 2);
        c.draw_fast_image(127, 8, 3, 8, &[0xFF, 0xFF, 0xFF]);
        assert_eq!(lit_count(&c), 10);
        c.draw_fast_image(200, 0, 3, 8, &[0xFF, 0xFF, 0xFF]);
        assert_eq!(lit_count(&c), 10);
    }

    #[test]
    fn black_blit_clears_only_set_bits() {
        let mut c = canvas();
        c.fill_rect(0, 0, 4, 16);
        c.set_color(Color::Black);
        c.draw_fast_image(1, 3, 2, 8, &[0x0F, 0x0F]);
        assert_eq!(lit_in_col(&c, 0), (0..16).collect::<Vec<_>>());
        let expected: Vec<i16> = (0..3).chain(7..16).collect();
        assert_eq!(lit_in_col(&c, 1), expected);
        assert_eq!(lit_in_col(&c, 2), expected);
    }

    #[test]
    fn extra_bytes_are_ignored() {
        let mut c = canvas();
        c.draw_fast_image(0, 0, 1, 8, &[0x01, 0xFF]);
        assert_eq!(lit_count(&c), 1);
    }

    #[test]
    fn xbm_bit_order_and_padding() {
        let mut c = canvas();
        // 10 pixels wide: two bytes per row, LSB leftmost.
        c.draw_xbm(2, 1, 10, 2, &[0b0000_0101, 0b10, 0x00, 0b01]);
        assert_eq!(c.pixel(2, 1), Some(true));
        assert_eq!(c.pixel(3, 1), Some(false));
        assert_eq!(c.pixel(4, 1), Some(true));
        assert_eq!(c.pixel(11, 1), Some(true));
        assert_eq!(c.pixel(10, 2), Some(true));
        assert_eq!(lit_count(&c), 4);
    }

    #[test]
    fn images_near_coordinate_limits_are_clipped() {
        let mut c = canvas();
        c.draw_fast_image(i16::MAX - 1, 0, 4, 8, &[0xFF; 4]);
        c.draw_fast_image(i16::MIN, i16::MIN, 4, 8, &[0xFF; 4]);
        c.draw_xbm(i16::MAX - 1, i16::MAX - 1, 8, 8, &[0xFF; 8]);
        assert_eq!(lit_count(&c), 0);

        c.draw_fast_image(-2, i16::MAX, 4, i16::MAX, &[0xFF; 4]);
        assert_eq!(lit_count(&c), 0);
    }
}
