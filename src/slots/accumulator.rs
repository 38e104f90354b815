//! Slot accumulation across the keys of one command.
//!
//! Every key folded into a command moves its [`SlotState`] up a three-level
//! lattice: `Unset` -> `Single(slot)` -> `Conflict`. The state never moves
//! back down, so a conflict found on the second key is still visible after the
//! hundredth. Conflicts are recorded here and rejected at dispatch time.

use std::fmt;

/// Slot knowledge accumulated while building a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// No key has been observed; the command may run on any node.
    #[default]
    Unset,
    /// Every observed key maps to this slot.
    Single(u16),
    /// At least two observed keys map to different slots.
    Conflict,
}

impl SlotState {
    /// Fold one more key slot into the state.
    ///
    /// # Examples
    ///
    /// ```
    /// use valkey_cmds::slots::SlotState;
    ///
    /// let state = SlotState::Unset.observe(7).observe(7);
    /// assert_eq!(state, SlotState::Single(7));
    /// assert_eq!(state.observe(8), SlotState::Conflict);
    /// ```
    #[must_use]
    pub fn observe(self, slot: u16) -> Self {
        match self {
            SlotState::Unset => SlotState::Single(slot),
            SlotState::Single(s) if s == slot => self,
            SlotState::Single(_) | SlotState::Conflict => SlotState::Conflict,
        }
    }

    /// Join two states, as if every key behind `other` had been folded into `self`.
    #[must_use]
    pub fn merge(self, other: SlotState) -> Self {
        match other {
            SlotState::Unset => self,
            SlotState::Single(slot) => self.observe(slot),
            SlotState::Conflict => SlotState::Conflict,
        }
    }

    /// The single slot, if exactly one has been observed.
    pub fn slot(&self) -> Option<u16> {
        match self {
            SlotState::Single(slot) => Some(*slot),
            _ => None,
        }
    }

    /// Check if no key has been observed.
    pub fn is_unset(&self) -> bool {
        matches!(self, SlotState::Unset)
    }

    /// Check if keys in different slots have been observed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SlotState::Conflict)
    }
}

impl FromIterator<u16> for SlotState {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        iter.into_iter().fold(SlotState::Unset, SlotState::observe)
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotState::Unset => write!(f, "unset"),
            SlotState::Single(slot) => write!(f, "{}", slot),
            SlotState::Conflict => write!(f, "cross-slot"),
        }
    }
}
