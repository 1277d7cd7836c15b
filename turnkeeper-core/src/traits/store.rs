//! Turn state persistence trait

use crate::state::TurnState;
use crate::storage::PersistedRecord;

/// Errors from saving turn state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Sector erase failed
    Erase,
    /// Page program failed
    Program,
}

/// Durable home for the turn state
pub trait StateStore {
    /// Read the stored record
    ///
    /// Returns `None` when nothing valid is stored. Range checks and
    /// default substitution are up to the caller.
    fn load(&mut self) -> Option<PersistedRecord>;

    /// Replace the stored record with `state`
    fn save(&mut self, state: &TurnState) -> Result<(), StoreError>;
}
