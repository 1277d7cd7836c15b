//! Device configuration
//!
//! Values are fixed at build time (the firmware generates them from
//! `device.toml`). `Default` matches the reference cadence.

/// Most participants a device can track
pub const MAX_PARTICIPANTS: usize = 8;

/// Longest participant name, in characters
pub const MAX_NAME_LEN: usize = 12;

/// What the firmware does after boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunMode {
    /// Board bring-up: blink the status LED, nothing else
    Blink,
    /// Normal turn tracking
    #[default]
    Turns,
}

/// Runtime parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub mode: RunMode,
    /// Button sampling period (ms), also the debounce interval
    pub poll_interval_ms: u32,
    /// Frames in a slide transition
    pub transition_steps: u8,
    /// Delay after each transition frame (ms)
    pub frame_delay_ms: u32,
    /// Display contrast
    pub contrast: u8,
    /// Settling time before talking to the display after power up (ms)
    pub power_up_delay_ms: u32,
    /// Status LED half period in blink mode (ms)
    pub blink_interval_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Turns,
            poll_interval_ms: 20,
            transition_steps: 12,
            frame_delay_ms: 20,
            contrast: 0xCF,
            power_up_delay_ms: 100,
            blink_interval_ms: 500,
        }
    }
}

/// Participant names, in turn order
#[derive(Debug, Clone, Copy)]
pub struct Participants {
    names: &'static [&'static str],
}

impl Participants {
    /// Wrap a name list
    ///
    /// The list is truncated to `MAX_PARTICIPANTS`. An empty list is
    /// replaced by a single placeholder so there is always a holder.
    pub const fn new(names: &'static [&'static str]) -> Self {
        if names.is_empty() {
            Self { names: &["?"] }
        } else if names.len() > MAX_PARTICIPANTS {
            let (head, _) = names.split_at(MAX_PARTICIPANTS);
            Self { names: head }
        } else {
            Self { names }
        }
    }

    pub fn count(&self) -> u8 {
        self.names.len() as u8
    }

    /// Name for an index; out of range indices wrap
    pub fn name(&self, index: u8) -> &'static str {
        self.names[index as usize % self.names.len()]
    }
}
