//! Persisted record layout
//!
//! ```text
//! offset  size  field
//! 0       4     magic, little-endian 0x5455524E ("TURN")
//! 4       1     holder_index
//! 5       1     remaining_turns
//! 6       250   zero padding to the program page
//! ```
//!
//! The magic never changes between firmware versions. A sector whose
//! first four bytes differ from it holds no state (erased flash reads
//! back as 0xFF and therefore never validates).

use crate::state::TurnState;

/// Sentinel identifying a written record
pub const RECORD_MAGIC: u32 = 0x5455_524E;

/// Flash program page size; a record is always written as one full page
pub const PAGE_SIZE: usize = 256;

/// Meaningful bytes at the start of the page
pub const RECORD_LEN: usize = 6;

/// Raw record as stored
///
/// Values are not range checked here. A record can decode fine and
/// still carry values the controller must reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PersistedRecord {
    pub holder_index: u8,
    pub remaining_turns: u8,
}

impl From<TurnState> for PersistedRecord {
    fn from(state: TurnState) -> Self {
        Self::new(state.holder_index, state.remaining_turns)
    }
}

impl PersistedRecord {
    pub const fn new(holder_index: u8, remaining_turns: u8) -> Self {
        Self {
            holder_index,
            remaining_turns,
        }
    }

    /// Stored values as a turn state (unvalidated)
    pub fn state(&self) -> TurnState {
        TurnState {
            holder_index: self.holder_index,
            remaining_turns: self.remaining_turns,
        }
    }

    /// Serialize into a zero padded program page
    pub fn encode(&self) -> [u8; PAGE_SIZE] {
        let mut page = [0u8; PAGE_SIZE];
        page[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
        page[4] = self.holder_index;
        page[5] = self.remaining_turns;
        page
    }

    /// Parse the start of a page, `None` when the magic does not match
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..RECORD_LEN)?;
        let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if magic != RECORD_MAGIC {
            return None;
        }
        Some(Self::new(header[4], header[5]))
    }
}
