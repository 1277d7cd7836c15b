//! Button input
//!
//! Two active-low buttons sampled at a fixed period. The sampling
//! period is the debounce interval; actions commit on release.

pub mod debounce;

pub use debounce::{Buttons, Debouncer, ReleaseLatch, MAX_EDGES_PER_POLL};
