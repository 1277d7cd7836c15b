//! Turn tracking state machine
//!
//! The whole device state is a `TurnState`. There is no separate mode
//! enum: every transition is a function of the state and a button edge.

pub mod events;
pub mod turn;

pub use events::{EdgeKind, InputEdge, Source};
pub use turn::{Transition, TurnController, TurnState, MAX_TURNS, MIN_TURNS};
