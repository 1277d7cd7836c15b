//! Packed 1-bit framebuffer
//!
//! The buffer uses the controller's page layout: each byte is one column
//! of eight vertically adjacent pixels (bit 0 = top row of the page),
//! pages run top to bottom and columns left to right. Pushing the frame
//! is then a straight copy of the bytes.
//!
//! Every drawing call clips silently. Pixels outside the panel are
//! dropped so layout code may overshoot the edges freely.

use super::font::{glyph, GLYPH_ADVANCE, GLYPH_HEIGHT};

/// Panel width in pixels
pub const WIDTH: i16 = 128;

/// Panel height in pixels
pub const HEIGHT: i16 = 64;

/// Number of 8-row pages
pub const PAGES: usize = (HEIGHT as usize + 7) / 8;

/// Buffer size in bytes
pub const BUFFER_LEN: usize = WIDTH as usize * PAGES;

/// Off-screen monochrome frame
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    buf: [u8; BUFFER_LEN],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let lit = self.buf.iter().map(|b| b.count_ones()).sum::<u32>();
        write!(f, "Framebuffer({}x{}, {} lit)", WIDTH, HEIGHT, lit)
    }
}

impl Framebuffer {
    /// Create a blank (all off) framebuffer
    pub const fn new() -> Self {
        Self {
            buf: [0; BUFFER_LEN],
        }
    }

    /// Raw bytes in page-major order
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Bytes of a single page (one column byte per x), `None` past the last page
    pub fn page(&self, page: usize) -> Option<&[u8]> {
        let start = page.checked_mul(WIDTH as usize)?;
        self.buf.get(start..start + WIDTH as usize)
    }

    /// Byte index and bit mask for a pixel, `None` when off-panel
    fn locate(x: i16, y: i16) -> Option<(usize, u8)> {
        if !(0..WIDTH).contains(&x) || !(0..HEIGHT).contains(&y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((x + (y / 8) * WIDTH as usize, 1 << (y % 8)))
    }

    /// Read back a pixel; off-panel reads as off
    pub fn pixel(&self, x: i16, y: i16) -> bool {
        match Self::locate(x, y) {
            Some((idx, mask)) => self.buf[idx] & mask != 0,
            None => false,
        }
    }

    /// Set or clear a single pixel
    pub fn set_pixel(&mut self, x: i16, y: i16, on: bool) {
        if let Some((idx, mask)) = Self::locate(x, y) {
            if on {
                self.buf[idx] |= mask;
            } else {
                self.buf[idx] &= !mask;
            }
        }
    }

    /// Fill the whole frame with one colour
    pub fn clear(&mut self, fill: bool) {
        self.buf.fill(if fill { 0xFF } else { 0x00 });
    }

    /// Draw a line with integer Bresenham stepping
    pub fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, on: bool) {
        // Widen so long off-panel lines cannot overflow the error term
        let (mut x, mut y) = (x0 as i32, y0 as i32);
        let (x1, y1) = (x1 as i32, y1 as i32);

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x as i16, y as i16, on);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Horizontal run of `w` pixels
    fn hline(&mut self, x: i16, y: i16, w: i16, on: bool) {
        if !(0..HEIGHT).contains(&y) {
            return;
        }
        let x_start = x.max(0);
        let x_end = x.saturating_add(w).min(WIDTH);
        for px in x_start..x_end {
            self.set_pixel(px, y, on);
        }
    }

    /// Vertical run of `h` pixels
    fn vline(&mut self, x: i16, y: i16, h: i16, on: bool) {
        if !(0..WIDTH).contains(&x) {
            return;
        }
        let y_start = y.max(0);
        let y_end = y.saturating_add(h).min(HEIGHT);
        for py in y_start..y_end {
            self.set_pixel(x, py, on);
        }
    }

    /// Rectangle outline; zero or negative size draws nothing
    pub fn draw_rect(&mut self, x: i16, y: i16, w: i16, h: i16, on: bool) {
        if w <= 0 || h <= 0 {
            return;
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);
        self.hline(x, y, w, on);
        self.hline(x, bottom, w, on);
        self.vline(x, y, h, on);
        self.vline(right, y, h, on);
    }

    /// Filled rectangle; zero or negative size draws nothing
    pub fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, on: bool) {
        if w <= 0 || h <= 0 {
            return;
        }
        let y_start = y.max(0);
        let y_end = y.saturating_add(h).min(HEIGHT);
        for py in y_start..y_end {
            self.hline(x, py, w, on);
        }
    }

    /// Draw one character at scale 1
    pub fn draw_char(&mut self, x: i16, y: i16, c: char, on: bool) {
        self.draw_char_scaled(x, y, c, 1, on);
    }

    /// Draw one character, each glyph pixel replicated into a
    /// `scale` x `scale` block. Unset glyph bits are left untouched.
    pub fn draw_char_scaled(&mut self, x: i16, y: i16, c: char, scale: u8, on: bool) {
        let s = scale.max(1) as i16;
        for (col, bits) in glyph(c).iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if bits & (1 << row) == 0 {
                    continue;
                }
                let px = x.saturating_add(col as i16 * s);
                let py = y.saturating_add(row * s);
                if s == 1 {
                    self.set_pixel(px, py, on);
                } else {
                    self.fill_rect(px, py, s, s, on);
                }
            }
        }
    }

    /// Draw a string at scale 1
    pub fn draw_string(&mut self, x: i16, y: i16, text: &str, on: bool) {
        self.draw_string_scaled(x, y, text, 1, on);
    }

    /// Draw a string left to right with a one pixel gap (scaled) between glyphs
    pub fn draw_string_scaled(&mut self, x: i16, y: i16, text: &str, scale: u8, on: bool) {
        let advance = GLYPH_ADVANCE * scale.max(1) as i16;
        let mut cx = x;
        for c in text.chars() {
            self.draw_char_scaled(cx, y, c, scale, on);
            cx = cx.saturating_add(advance);
        }
    }

    /// Width taken by `text` at `scale`, including the trailing gap
    pub fn text_width(text: &str, scale: u8) -> i16 {
        let n = text.chars().count().min(i16::MAX as usize) as i16;
        n.saturating_mul(GLYPH_ADVANCE * scale.max(1) as i16)
    }

    /// Height of a text line at `scale`
    pub fn text_height(scale: u8) -> i16 {
        GLYPH_HEIGHT * scale.max(1) as i16
    }
}
