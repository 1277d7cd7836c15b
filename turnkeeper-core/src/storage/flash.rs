//! Single-sector flash store
//!
//! Saves are erase-then-program of one reserved sector. The flash
//! controller cannot share the bus with running code during either
//! step, so both run inside one critical section. The section is
//! scoped, so it is released on the error paths as well.
//!
//! Reads go through `ReadNorFlash::read`. On the RP2040 the blocking
//! flash driver serves these from the XIP mapped view of the chip.

use embedded_storage::nor_flash::NorFlash;

use super::record::{PersistedRecord, PAGE_SIZE, RECORD_LEN};
use crate::state::TurnState;
use crate::traits::{StateStore, StoreError};

/// Turn state store backed by one flash sector
pub struct FlashStore<F> {
    flash: F,
    /// Sector start, relative to the flash base
    offset: u32,
}

impl<F: NorFlash> FlashStore<F> {
    /// Create a store for the sector at `offset`
    ///
    /// `offset` must be aligned to `F::ERASE_SIZE`.
    pub fn new(flash: F, offset: u32) -> Self {
        Self { flash, offset }
    }

    /// Sector start offset
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Give back the flash driver
    pub fn into_inner(self) -> F {
        self.flash
    }

    fn erase_and_program(&mut self, page: &[u8; PAGE_SIZE]) -> Result<(), StoreError> {
        let sector_end = self.offset + F::ERASE_SIZE as u32;
        let flash = &mut self.flash;
        let offset = self.offset;

        critical_section::with(|_| {
            flash
                .erase(offset, sector_end)
                .map_err(|_| StoreError::Erase)?;
            flash.write(offset, page).map_err(|_| StoreError::Program)
        })
    }
}

impl<F: NorFlash> StateStore for FlashStore<F> {
    fn load(&mut self) -> Option<PersistedRecord> {
        let mut header = [0u8; RECORD_LEN];
        self.flash.read(self.offset, &mut header).ok()?;
        PersistedRecord::decode(&header)
    }

    fn save(&mut self, state: &TurnState) -> Result<(), StoreError> {
        let page = PersistedRecord::from(*state).encode();
        self.erase_and_program(&page)
    }
}
