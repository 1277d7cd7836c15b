//! Turn controller
//!
//! Holds the current holder and how many turns they have left, and
//! applies button releases to it:
//!
//! - Take: one turn used. When none remain the next participant becomes
//!   holder with a single turn.
//! - Defer: one extra turn for the holder, capped at `MAX_TURNS`.
//!
//! A zero turn count never escapes `take`; it is normalized in the same
//! call that produced it.

use super::events::{InputEdge, Source};
use crate::storage::PersistedRecord;

/// Fewest turns a holder can have
pub const MIN_TURNS: u8 = 1;

/// Most turns a holder can accumulate
pub const MAX_TURNS: u8 = 3;

/// Complete device state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TurnState {
    /// Index into the participant list
    pub holder_index: u8,
    /// Turns left for the holder, always in `MIN_TURNS..=MAX_TURNS`
    pub remaining_turns: u8,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl TurnState {
    /// First participant, one turn
    pub const INITIAL: Self = Self {
        holder_index: 0,
        remaining_turns: MIN_TURNS,
    };

    /// Check the state against a participant count
    pub fn is_valid(&self, participants: u8) -> bool {
        self.holder_index < participants
            && (MIN_TURNS..=MAX_TURNS).contains(&self.remaining_turns)
    }
}

/// Result of applying one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Nothing changed (press edge, or defer at the cap)
    Ignored,
    /// Turn count changed, same holder
    Redraw,
    /// Holder rotated; `from` is the previous holder index
    Advance { from: u8 },
}

impl Transition {
    /// Whether the state changed and must be persisted
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Transition::Ignored)
    }
}

/// Owns the `TurnState` and applies edges to it
#[derive(Debug, Clone)]
pub struct TurnController {
    state: TurnState,
    participants: u8,
}

impl TurnController {
    /// Fresh controller in the initial state
    ///
    /// A participant count of zero is treated as one.
    pub fn new(participants: u8) -> Self {
        Self {
            state: TurnState::INITIAL,
            participants: participants.max(1),
        }
    }

    /// Controller resumed from a stored record
    ///
    /// Missing records and records whose values are out of range for
    /// this participant count both fall back to the initial state.
    pub fn restore(participants: u8, saved: Option<PersistedRecord>) -> Self {
        let mut controller = Self::new(participants);
        if let Some(record) = saved {
            let state = record.state();
            if state.is_valid(controller.participants) {
                controller.state = state;
            }
        }
        controller
    }

    /// Current state
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Participant count
    pub fn participants(&self) -> u8 {
        self.participants
    }

    /// Apply one debounced edge
    pub fn handle(&mut self, edge: InputEdge) -> Transition {
        if !edge.is_release() {
            return Transition::Ignored;
        }
        match edge.source {
            Source::Take => self.take(),
            Source::Defer => self.defer(),
        }
    }

    fn take(&mut self) -> Transition {
        let remaining = self.state.remaining_turns.saturating_sub(1);
        if remaining == 0 {
            let from = self.state.holder_index;
            self.state = TurnState {
                holder_index: (from + 1) % self.participants,
                remaining_turns: MIN_TURNS,
            };
            Transition::Advance { from }
        } else {
            self.state.remaining_turns = remaining;
            Transition::Redraw
        }
    }

    fn defer(&mut self) -> Transition {
        if self.state.remaining_turns >= MAX_TURNS {
            return Transition::Ignored;
        }
        self.state.remaining_turns += 1;
        Transition::Redraw
    }
}
