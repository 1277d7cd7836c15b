//! Board-agnostic core logic for the turn tracking firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Monochrome framebuffer and 5x7 bitmap font
//! - Release-edge button debouncing
//! - Turn state machine
//! - Persisted record format and single-sector flash store
//! - Screen layout and slide transition animation
//! - The control loop session and the LED diagnostic mode
//! - Trait seams for the display and state storage

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod blink;
pub mod config;
pub mod gfx;
pub mod input;
pub mod session;
pub mod state;
pub mod storage;
pub mod traits;
pub mod ui;

// Re-export key types
pub use config::{DeviceConfig, RunMode};
pub use gfx::Framebuffer;
pub use session::{StepReport, TurnSession};
pub use state::{InputEdge, TurnController, TurnState};
