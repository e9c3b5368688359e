//! Lines, rectangles, circles and the progress bar. Everything is clipped to the buffer, drawing
//! off-screen is never an error.

use super::Canvas;

/// Quadrant bits for `Canvas::draw_circle_quads`.
pub mod quads {
    pub const UPPER_RIGHT: u8 = 0b0001;
    pub const UPPER_LEFT: u8 = 0b0010;
    pub const LOWER_LEFT: u8 = 0b0100;
    pub const LOWER_RIGHT: u8 = 0b1000;
    pub const ALL: u8 = 0b1111;
}

/// Midpoint circle stepper yielding the `(x, y)` offsets of one octant, `x` growing from 1.
struct Midpoint {
    x: i32,
    y: i32,
    dp: i32,
}

impl Midpoint {
    fn new(radius: i32) -> Self {
        Midpoint {
            x: 0,
            y: radius,
            dp: 1 - radius,
        }
    }
}

impl Iterator for Midpoint {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        // The first step always happens, even for a zero radius.
        if self.x != 0 && self.x >= self.y {
            return None;
        }
        if self.dp < 0 {
            self.dp += 2 * self.x + 3;
        } else {
            self.dp += 2 * self.x - 2 * self.y + 5;
            self.y -= 1;
        }
        self.x += 1;
        Some((self.x, self.y))
    }
}

impl Canvas {
    /// Draw a line between two points with Bresenham's algorithm.
    pub fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16) {
        let (mut x0, mut y0, mut x1, mut y1) = (x0 as i32, y0 as i32, x1 as i32, y1 as i32);
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            core::mem::swap(&mut x0, &mut y0);
            core::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;

        for x in x0..=x1 {
            if steep {
                self.plot(y, x);
            } else {
                self.plot(x, y);
            }
            err -= dy;
            if err < 0 {
                y += ystep;
                err += dx;
            }
        }
    }

    /// Draw a horizontal run of `length` pixels starting at `(x, y)`.
    pub fn draw_horizontal_line(&mut self, x: i16, y: i16, length: i16) {
        self.hline(x as i32, y as i32, length as i32);
    }

    fn hline(&mut self, x: i32, y: i32, length: i32) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        let (mut x, mut length) = (x, length);
        if y < 0 || y >= h {
            return;
        }
        if x < 0 {
            length += x;
            x = 0;
        }
        if x + length > w {
            length = w - x;
        }
        if length <= 0 {
            return;
        }

        let bit = 1u8 << (y & 7);
        let page = (y / 8) as i16;
        let color = self.color;
        for col in x..x + length {
            self.buffer.combine_byte(col as i16, page, bit, color);
        }
    }

    /// Draw a vertical run of `length` pixels starting at `(x, y)`, a whole page byte at a time
    /// where possible.
    pub fn draw_vertical_line(&mut self, x: i16, y: i16, length: i16) {
        self.vline(x as i32, y as i32, length as i32);
    }

    fn vline(&mut self, x: i32, y: i32, length: i32) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        let (mut y, mut length) = (y, length);
        if x < 0 || x >= w {
            return;
        }
        if y < 0 {
            length += y;
            y = 0;
        }
        if y + length > h {
            length = h - y;
        }
        if length <= 0 {
            return;
        }

        let color = self.color;
        let col = x as i16;
        let mut page = (y / 8) as i16;
        let y_offset = y & 7;

        // Leading partial page.
        if y_offset != 0 {
            let room = 8 - y_offset;
            let mut bits = 0xFFu8 << y_offset;
            if length < room {
                bits &= 0xFFu8 >> (room - length);
            }
            self.buffer.combine_byte(col, page, bits, color);
            if length <= room {
                return;
            }
            length -= room;
            page += 1;
        }

        while length >= 8 {
            self.buffer.combine_byte(col, page, 0xFF, color);
            page += 1;
            length -= 8;
        }

        // Trailing partial page.
        if length > 0 {
            self.buffer
                .combine_byte(col, page, (1u8 << length) - 1, color);
        }
    }

    /// Draw the outline of a `width` x `height` rectangle whose top left corner is `(x, y)`.
    /// Every outline pixel is touched exactly once, so `Color::Inverse` outlines are closed.
    pub fn draw_rect(&mut self, x: i16, y: i16, width: i16, height: i16) {
        let (x, y, width, height) = (x as i32, y as i32, width as i32, height as i32);
        if width <= 0 || height <= 0 {
            return;
        }
        self.hline(x, y, width);
        if height > 1 {
            self.hline(x, y + height - 1, width);
        }
        if height > 2 {
            self.vline(x, y + 1, height - 2);
            if width > 1 {
                self.vline(x + width - 1, y + 1, height - 2);
            }
        }
    }

    /// Fill a `width` x `height` rectangle whose top left corner is `(x, y)`.
    pub fn fill_rect(&mut self, x: i16, y: i16, width: i16, height: i16) {
        self.rect_fill(x as i32, y as i32, width as i32, height as i32);
    }

    fn rect_fill(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }
        // Only the on-screen columns.
        let first = x.max(0);
        let last = (x + width).min(self.width() as i32);
        for col in first..last {
            self.vline(col, y, height);
        }
    }

    /// Draw the outline of a circle centered on `(x0, y0)`.
    pub fn draw_circle(&mut self, x0: i16, y0: i16, radius: i16) {
        let (x0, y0, radius) = (x0 as i32, y0 as i32, radius as i32);
        if radius < 0 {
            return;
        }
        for (x, y) in Midpoint::new(radius) {
            self.plot(x0 + x, y0 + y);
            self.plot(x0 - x, y0 + y);
            self.plot(x0 + x, y0 - y);
            self.plot(x0 - x, y0 - y);
            if x != y {
                self.plot(x0 + y, y0 + x);
                self.plot(x0 - y, y0 + x);
                self.plot(x0 + y, y0 - x);
                self.plot(x0 - y, y0 - x);
            }
        }
        self.plot(x0 + radius, y0);
        self.plot(x0, y0 + radius);
        self.plot(x0 - radius, y0);
        self.plot(x0, y0 - radius);
    }

    /// Draw only the quadrants of a circle outline selected by the `quads` bit mask, see the
    /// `quads` module. The axis end points are drawn when both neighboring quadrants are
    /// selected.
    pub fn draw_circle_quads(&mut self, x0: i16, y0: i16, radius: i16, quads: u8) {
        self.circle_quads(x0 as i32, y0 as i32, radius as i32, quads);
    }

    fn circle_quads(&mut self, x0: i32, y0: i32, radius: i32, quads: u8) {
        if radius < 0 {
            return;
        }
        for (x, y) in Midpoint::new(radius) {
            if quads & quads::UPPER_RIGHT != 0 {
                self.plot(x0 + x, y0 - y);
                self.plot(x0 + y, y0 - x);
            }
            if quads & quads::UPPER_LEFT != 0 {
                self.plot(x0 - y, y0 - x);
                self.plot(x0 - x, y0 - y);
            }
            if quads & quads::LOWER_LEFT != 0 {
                self.plot(x0 - y, y0 + x);
                self.plot(x0 - x, y0 + y);
            }
            if quads & quads::LOWER_RIGHT != 0 {
                self.plot(x0 + x, y0 + y);
                self.plot(x0 + y, y0 + x);
            }
        }
        let has = |q: u8| quads & q == q;
        if has(quads::UPPER_RIGHT | quads::LOWER_RIGHT) {
            self.plot(x0 + radius, y0);
        }
        if has(quads::LOWER_LEFT | quads::LOWER_RIGHT) {
            self.plot(x0, y0 + radius);
        }
        if has(quads::UPPER_LEFT | quads::LOWER_LEFT) {
            self.plot(x0 - radius, y0);
        }
        if has(quads::UPPER_RIGHT | quads::UPPER_LEFT) {
            self.plot(x0, y0 - radius);
        }
    }

    /// Fill a circle centered on `(x0, y0)` with horizontal spans.
    pub fn fill_circle(&mut self, x0: i16, y0: i16, radius: i16) {
        let (x0, y0, radius) = (x0 as i32, y0 as i32, radius as i32);
        if radius < 0 {
            return;
        }
        for (x, y) in Midpoint::new(radius) {
            self.hline(x0 - x, y0 - y, 2 * x);
            self.hline(x0 - x, y0 + y, 2 * x);
            self.hline(x0 - y, y0 - x, 2 * y);
            self.hline(x0 - y, y0 + x, 2 * y);
        }
        self.hline(x0 - radius, y0, 2 * radius);
    }

    /// Draw a progress bar: a rounded outline whose outer dimensions are `width` x `height`, and
    /// an inner bar inset by 2 pixels whose width is `(width - 4) * progress / 100`, rounded
    /// down. `progress` is clamped to 100.
    pub fn draw_progress_bar(&mut self, x: i16, y: i16, width: i16, height: i16, progress: u8) {
        let (x, y, width, height) = (x as i32, y as i32, width as i32, height as i32);
        if width <= 0 || height <= 0 {
            return;
        }
        let progress = progress.min(100) as i32;
        let radius = height / 2;
        let x_radius = x + radius;
        let y_radius = y + radius;
        let straight = width - 2 * radius + 1;

        self.circle_quads(x_radius, y_radius, radius, quads::UPPER_LEFT | quads::LOWER_LEFT);
        self.hline(x_radius, y, straight);
        self.hline(x_radius, y + 2 * radius, straight);
        self.circle_quads(
            x + width - radius,
            y_radius,
            radius,
            quads::UPPER_RIGHT | quads::LOWER_RIGHT,
        );

        let inner_width = (width - 4).max(0) * progress / 100;
        self.rect_fill(x + 2, y + 2, inner_width, height - 3);
    }
}
