//! Persistent turn state
//!
//! One tagged record in one reserved flash sector. No wear leveling:
//! every save erases and reprograms the same sector.

pub mod flash;
pub mod record;

pub use flash::FlashStore;
pub use record::{PersistedRecord, PAGE_SIZE, RECORD_LEN, RECORD_MAGIC};
