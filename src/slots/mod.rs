//! Pure slot logic for clustered command construction.
//!
//! Everything here is side-effect free: hashing a key to its slot, folding
//! slots into a per-command [`SlotState`], and looking up which node owns a
//! slot.
//!
//! ## Module Structure
//!
//! - [`hash`]: CRC16 key hashing with hashtag extraction
//! - [`accumulator`]: The `Unset` / `Single` / `Conflict` lattice
//! - [`distribution`]: Slot ranges and the slot ownership table

pub mod accumulator;
pub mod distribution;
pub mod hash;

pub use accumulator::SlotState;
pub use distribution::{SlotRange, SlotRangeError, SlotTable, TOTAL_SLOTS, even_ranges};
pub use hash::{key_slot, slot};
