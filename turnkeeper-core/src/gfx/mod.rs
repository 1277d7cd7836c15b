//! Monochrome graphics
//!
//! A packed 1-bit framebuffer with drawing primitives and a fixed
//! 5x7 bitmap font. Nothing in here performs I/O.

pub mod font;
pub mod framebuffer;

pub use font::{glyph, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use framebuffer::{Framebuffer, BUFFER_LEN, HEIGHT, PAGES, WIDTH};
