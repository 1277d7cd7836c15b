//! Holder screen layout
//!
//! ```text
//! +------------------------------+
//! |                              |
//! |            MAIA              |   name, largest scale that fits
//! |                              |
//! |         [#] [ ] [ ]          |   one filled slot per remaining turn
//! +------------------------------+
//! ```
//!
//! All drawing takes a horizontal shift so the animator can slide the
//! whole block sideways.

use crate::gfx::{Framebuffer, HEIGHT, WIDTH};
use crate::state::MAX_TURNS;

/// Name scales tried, largest first
const NAME_SCALES: [u8; 3] = [3, 2, 1];

/// Horizontal room for the name inside the border
const NAME_MAX_WIDTH: i16 = WIDTH - 4;

/// Name block sits a little above centre to leave room for the slots
const NAME_LIFT: i16 = 4;

const SLOT_SIZE: i16 = 7;
const SLOT_GAP: i16 = 5;
const SLOT_TOP: i16 = HEIGHT - 18;

/// What the screen shows for one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolderView<'a> {
    pub name: &'a str,
    pub remaining_turns: u8,
}

impl<'a> HolderView<'a> {
    pub fn new(name: &'a str, remaining_turns: u8) -> Self {
        Self {
            name,
            remaining_turns,
        }
    }
}

/// Largest scale at which `name` fits inside the border
pub fn name_scale(name: &str) -> u8 {
    NAME_SCALES
        .iter()
        .copied()
        .find(|&s| Framebuffer::text_width(name, s) <= NAME_MAX_WIDTH)
        .unwrap_or(1)
}

/// Top-left corner of the name at zero shift
pub fn name_origin(name: &str) -> (i16, i16) {
    let scale = name_scale(name);
    let x = (WIDTH - Framebuffer::text_width(name, scale)) / 2;
    let y = (HEIGHT - Framebuffer::text_height(scale)) / 2 - NAME_LIFT;
    (x, y)
}

/// Panel outline
pub fn draw_border(fb: &mut Framebuffer) {
    fb.draw_rect(0, 0, WIDTH, HEIGHT, true);
}

/// Name and turn slots, shifted right by `dx`
pub fn draw_holder(fb: &mut Framebuffer, view: &HolderView<'_>, dx: i16) {
    let scale = name_scale(view.name);
    let (x, y) = name_origin(view.name);
    fb.draw_string_scaled(x.saturating_add(dx), y, view.name, scale, true);

    let slots = MAX_TURNS as i16;
    let row_width = slots * SLOT_SIZE + (slots - 1) * SLOT_GAP;
    let left = (WIDTH - row_width) / 2;
    for i in 0..slots {
        let sx = (left + i * (SLOT_SIZE + SLOT_GAP)).saturating_add(dx);
        if i < view.remaining_turns as i16 {
            fb.fill_rect(sx, SLOT_TOP, SLOT_SIZE, SLOT_SIZE, true);
        } else {
            fb.draw_rect(sx, SLOT_TOP, SLOT_SIZE, SLOT_SIZE, true);
        }
    }
}

/// The resting screen for a holder
pub fn compose_steady(fb: &mut Framebuffer, view: &HolderView<'_>) {
    fb.clear(false);
    draw_border(fb);
    draw_holder(fb, view, 0);
}
