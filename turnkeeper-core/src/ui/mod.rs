//! Screen layout and transitions

pub mod animator;
pub mod scene;

pub use animator::{AnimationReport, SlideTransition};
pub use scene::HolderView;
