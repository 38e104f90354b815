//! The carrier threaded through every command's grammar.
//!
//! An [`Incomplete`] owns the pooled token buffer, the slot accumulated from
//! the keys seen so far, and the command flags. Shape types wrap it and move
//! it from shape to shape; only the finalizers give it up.

use crate::cmds::buffer::ArgumentBuffer;
use crate::cmds::builder::SlotMode;
use crate::cmds::completed::{Cacheable, Completed};
use crate::cmds::flags::CommandFlags;
use crate::slots::{SlotState, hash};

/// A command under construction.
#[derive(Debug)]
pub struct Incomplete {
    buf: ArgumentBuffer,
    slots: SlotState,
    flags: CommandFlags,
    mode: SlotMode,
}

impl Incomplete {
    /// Start a command in `buf`: write the name, seed the flags.
    pub(crate) fn new(
        mut buf: ArgumentBuffer,
        mode: SlotMode,
        flags: CommandFlags,
        name: &[&str],
    ) -> Self {
        buf.extend(name.iter().copied());
        Self {
            buf,
            slots: SlotState::Unset,
            flags,
            mode,
        }
    }

    /// Append a key token and fold its slot.
    pub(crate) fn key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.mode == SlotMode::Cluster {
            self.slots = self.slots.observe(hash::slot(&key));
        }
        self.buf.push(key);
    }

    /// Append several key tokens in order.
    pub(crate) fn keys<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        for key in keys {
            self.key(key);
        }
    }

    /// Append a non-key token.
    pub(crate) fn arg(&mut self, token: impl Into<String>) {
        self.buf.push(token);
    }

    /// Append several non-key tokens in order.
    pub(crate) fn args<I, T>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.buf.extend(tokens);
    }

    /// Append a keyword followed by an integer.
    pub(crate) fn option_int(&mut self, keyword: &str, value: i64) {
        self.buf.push(keyword);
        self.buf.push(value.to_string());
    }

    pub(crate) fn flag(&mut self, flags: CommandFlags) {
        self.flags |= flags;
    }

    pub(crate) fn tokens(&self) -> &[String] {
        self.buf.as_slice()
    }

    /// Slot state of the keys appended so far.
    pub fn slot_state(&self) -> SlotState {
        self.slots
    }

    /// Flags accumulated so far.
    pub fn flags(&self) -> CommandFlags {
        self.flags
    }

    pub(crate) fn build(self) -> Completed {
        Completed::from_parts(self.buf.freeze(), self.flags, self.slots)
    }

    pub(crate) fn cache(self) -> Cacheable {
        Cacheable::from_completed(self.build())
    }
}
