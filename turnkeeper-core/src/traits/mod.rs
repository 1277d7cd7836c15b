//! Hardware abstraction traits
//!
//! These are the seams between the control loop and the board: where
//! frames go, and where turn state is kept across power loss.

pub mod display;
pub mod store;

pub use display::FrameSink;
pub use store::{StateStore, StoreError};
