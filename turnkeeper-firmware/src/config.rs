//! Build-time device configuration
//!
//! `build.rs` validates `device.toml` and generates the constants
//! included here, so a bad configuration fails the build instead of
//! the boot.

use turnkeeper_core::config::{DeviceConfig, Participants, RunMode};

include!(concat!(env!("OUT_DIR"), "/device_config.rs"));

/// Participants in turn order
pub const PARTICIPANTS: Participants = Participants::new(PARTICIPANT_NAMES);
